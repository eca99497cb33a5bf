//! Error types for chunkpatch-edit.
//!
//! The variants mirror the reportable I/O outcomes: a missing file is kept
//! separate from other read failures because the two are reported
//! differently.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    /// The resolved path does not exist.
    #[error("could not find file ({path})")]
    FileNotFound { path: Utf8PathBuf },

    #[error("fs read error on {path} ({source})")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fs write error on {path} ({source})")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApplyError {
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::FileNotFound { path } | Self::Read { path, .. } | Self::Write { path, .. } => {
                path
            }
        }
    }
}
