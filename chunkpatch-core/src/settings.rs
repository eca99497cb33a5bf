//! Clap-free settings for the rewrite pipeline.

use camino::Utf8PathBuf;
use chunkpatch_types::config::RewriteConfig;

/// Settings for one rewrite invocation.
#[derive(Debug, Clone)]
pub struct RewriteSettings {
    /// Stats file describing the completed build.
    pub stats_path: Utf8PathBuf,

    /// Where to write report artifacts. `None` skips artifact writing.
    pub out_dir: Option<Utf8PathBuf>,

    pub config: RewriteConfig,

    /// Overrides the snapshot's recorded public path. Useful when the stats
    /// emitter does not record one.
    pub public_path_override: Option<String>,

    /// Run every step except the final write.
    pub dry_run: bool,
}

impl RewriteSettings {
    pub fn new(stats_path: Utf8PathBuf, config: RewriteConfig) -> Self {
        Self {
            stats_path,
            out_dir: None,
            config,
            public_path_override: None,
            dry_run: false,
        }
    }
}
