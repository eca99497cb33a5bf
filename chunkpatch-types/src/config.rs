use serde::{Deserialize, Serialize};

/// What to rewrite and what to rewrite it into.
///
/// Both fields are mandatory. An empty or whitespace-only value counts as
/// missing: the run becomes a no-op that reports the usage message instead
/// of touching any file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Expression referencing the runtime global that will replace the
    /// static public path, e.g. `window.__ASSET_BASE__`.
    pub external_global: String,

    /// Name of the chunk whose script file carries the public path literal,
    /// usually the manifest/runtime chunk.
    pub chunk_name: String,
}

impl RewriteConfig {
    pub fn new(external_global: impl Into<String>, chunk_name: impl Into<String>) -> Self {
        Self {
            external_global: external_global.into(),
            chunk_name: chunk_name.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.external_global.trim().is_empty() && !self.chunk_name.trim().is_empty()
    }
}

/// Usage lines reported when mandatory configuration is missing.
pub const USAGE: &str = "    [mandatory] external_global - expression for the global var you want to use as publicPath.
    [mandatory] chunk_name - name of the chunk in which to look for publicPath references.";
