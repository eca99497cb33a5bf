use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Everything the edit engine needs to perform one rewrite.
///
/// Produced by planning, consumed by apply. The plan carries no reference to
/// the snapshot it came from; each invocation owns its own plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePlan {
    /// Chunk the target file was found in.
    pub chunk_name: String,

    /// Emitted file name within that chunk.
    pub file_name: String,

    /// Resolved on-disk location of the file.
    pub path: Utf8PathBuf,

    /// Literal text to find: the public path wrapped in double quotes, the
    /// way bundlers serialize string literals into emitted code.
    pub search_pattern: String,

    /// Replacement expression, written verbatim (unquoted).
    pub replacement: String,
}

/// Result of applying a plan to the file on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteApply {
    /// Number of pattern occurrences replaced. Zero means the file no longer
    /// (or never) contained the pattern and nothing was written.
    pub occurrences: u64,

    /// True when the modified text reached disk. False on dry-run and when
    /// `occurrences` is zero.
    pub written: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<FileChange>,

    /// Unified diff of the change. Empty when nothing changed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub patch: String,
}

/// Before/after record for a touched file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub before_sha256: String,
    pub after_sha256: String,
    pub before_bytes: u64,
    pub after_bytes: u64,
}

/// Terminal result of one invocation.
///
/// Every variant is non-fatal to the surrounding build: the pipeline reports
/// it and returns. There is no retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewriteOutcome {
    /// The pattern was found and every occurrence replaced.
    Replaced { file: String, occurrences: u64 },

    /// Mandatory configuration missing; nothing was attempted.
    MissingConfig,

    /// The snapshot carries no public path to search for.
    MissingPublicPath,

    /// No chunk with the configured name.
    ChunkNotFound { chunk: String },

    /// The chunk has no `.js` member file.
    NoScriptFile { chunk: String },

    /// The file name resolves to no on-disk location.
    AssetUnresolved { file: String },

    /// The resolved path does not exist.
    FileNotFound { path: String },

    /// The file was read but contains no occurrence of the pattern. A second
    /// run over an already-rewritten file lands here; the file is untouched.
    PatternMissing { path: String },

    ReadError { path: String, message: String },

    WriteError { path: String, message: String },

    /// The stats file could not be loaded or parsed.
    SnapshotError { message: String },
}

impl RewriteOutcome {
    /// Human-readable one-liner for log output.
    pub fn describe(&self) -> String {
        match self {
            Self::Replaced { file, occurrences } => {
                format!("replaced publicPath ({occurrences} occurrence(s) in {file})")
            }
            Self::MissingConfig => "some mandatory option missing".to_string(),
            Self::MissingPublicPath => {
                "output publicPath must be defined; it is only a placeholder to find and replace, \
                 so pick a value distinctive enough that nothing else matches"
                    .to_string()
            }
            Self::ChunkNotFound { chunk } => format!("could not find chunk '{chunk}'"),
            Self::NoScriptFile { chunk } => {
                format!("chunk '{chunk}' has no .js file to rewrite")
            }
            Self::AssetUnresolved { file } => {
                format!("no on-disk location known for '{file}'")
            }
            Self::FileNotFound { path } => format!("could not find file ({path})"),
            Self::PatternMissing { path } => {
                format!("publicPath literal not present in {path}; nothing rewritten")
            }
            Self::ReadError { path, message } => format!("fs read error on {path} ({message})"),
            Self::WriteError { path, message } => format!("fs write error on {path} ({message})"),
            Self::SnapshotError { message } => format!("could not load build stats ({message})"),
        }
    }

    pub fn is_replaced(&self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}
