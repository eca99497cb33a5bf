//! Loads the bundler's stats file into a [`BuildSnapshot`].
//!
//! The loader never returns `Err` itself: I/O and parse failures are carried
//! inside the [`LoadedSnapshot`] so the pipeline can turn them into a
//! reported outcome instead of aborting the build.

use camino::{Utf8Path, Utf8PathBuf};
use chunkpatch_types::snapshot::BuildSnapshot;
use fs_err as fs;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub path: Utf8PathBuf,
    pub snapshot: Result<BuildSnapshot, StatsLoadError>,
}

#[derive(Debug, Error, Clone)]
pub enum StatsLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("json parse error: {message}")]
    Json { message: String },
}

pub fn load_stats(path: &Utf8Path) -> LoadedSnapshot {
    debug!(path = %path, "loading build stats");

    let snapshot = match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str::<BuildSnapshot>(&s).map_err(|e| StatsLoadError::Json {
            message: e.to_string(),
        }),
        Err(e) => Err(StatsLoadError::Io {
            message: e.to_string(),
        }),
    };

    LoadedSnapshot {
        path: path.to_path_buf(),
        snapshot,
    }
}
