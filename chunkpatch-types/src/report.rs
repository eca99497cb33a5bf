use crate::rewrite::{FileChange, RewriteOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Machine-readable record of one rewrite invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteReport {
    /// Schema identifier, `chunkpatch.report.v1`.
    pub schema: String,

    pub tool: ToolInfo,

    pub run: RunInfo,

    pub verdict: Verdict,

    pub outcome: RewriteOutcome,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<FileChange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<ReportArtifacts>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub id: Uuid,

    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub status: VerdictStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Pass,
    Warn,
    Fail,
    #[default]
    Unknown,
}

/// File names of sibling artifacts, relative to the report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl RewriteOutcome {
    /// Verdict mapping: replaced passes, config/lookup/no-match conditions
    /// warn, I/O and snapshot failures fail.
    pub fn verdict_status(&self) -> VerdictStatus {
        match self {
            Self::Replaced { .. } => VerdictStatus::Pass,
            Self::MissingConfig
            | Self::MissingPublicPath
            | Self::ChunkNotFound { .. }
            | Self::NoScriptFile { .. }
            | Self::AssetUnresolved { .. }
            | Self::PatternMissing { .. } => VerdictStatus::Warn,
            Self::FileNotFound { .. }
            | Self::ReadError { .. }
            | Self::WriteError { .. }
            | Self::SnapshotError { .. } => VerdictStatus::Fail,
        }
    }
}
