//! Configuration file loading for chunkpatch.
//!
//! Discovers and loads `chunkpatch.toml` from the working directory.
//! File settings merge with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "chunkpatch.toml";

/// Top-level configuration from chunkpatch.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChunkpatchConfig {
    pub rewrite: RewriteSection,
    pub output: OutputSection,
}

/// Rewrite section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RewriteSection {
    /// Expression for the global var used as publicPath at runtime.
    pub external_global: Option<String>,

    /// Name of the chunk in which to look for publicPath references.
    pub chunk_name: Option<String>,

    /// Override for the public path recorded in the stats file.
    pub public_path: Option<String>,
}

/// Output section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Directory for report artifacts.
    pub dir: Option<Utf8PathBuf>,
}

/// Load the explicit config file, or the discovered one, or defaults.
///
/// An explicitly named file that cannot be read or parsed is an error; a
/// merely absent discovered file is not.
pub fn resolve(explicit: Option<&Utf8Path>) -> anyhow::Result<ChunkpatchConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match discover_config(Utf8Path::new(".")) {
        Some(path) => load_config(&path),
        None => Ok(ChunkpatchConfig::default()),
    }
}

fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

fn load_config(path: &Utf8Path) -> anyhow::Result<ChunkpatchConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    toml::from_str(&contents).with_context(|| format!("parse config file {}", path))
}
