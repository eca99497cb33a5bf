//! Report construction and human-readable rendering.

use chrono::{DateTime, Utc};
use chunkpatch_types::report::{RewriteReport, RunInfo, ToolInfo, Verdict};
use chunkpatch_types::rewrite::{RewriteApply, RewriteOutcome};
use chunkpatch_types::schema;
use uuid::Uuid;

/// Fixed prefix for user-facing lines, so chunkpatch output stands out
/// inside a noisy build log.
pub const BANNER_PREFIX: &str = "-------- chunkpatch:";

pub fn banner_line(msg: &str) -> String {
    format!("{BANNER_PREFIX} {msg}")
}

pub(crate) fn report_from_outcome(
    outcome: &RewriteOutcome,
    apply: Option<&RewriteApply>,
    tool: ToolInfo,
    started_at: DateTime<Utc>,
) -> RewriteReport {
    let status = outcome.verdict_status();

    let reasons = if outcome.is_replaced() {
        vec![]
    } else {
        vec![reason_token(outcome).to_string()]
    };

    RewriteReport {
        schema: schema::CHUNKPATCH_REPORT_V1.to_string(),
        tool,
        run: RunInfo {
            id: Uuid::new_v4(),
            started_at,
            ended_at: Some(Utc::now()),
        },
        verdict: Verdict { status, reasons },
        outcome: outcome.clone(),
        change: apply.and_then(|a| a.change.clone()),
        artifacts: None,
    }
}

fn reason_token(outcome: &RewriteOutcome) -> &'static str {
    match outcome {
        RewriteOutcome::Replaced { .. } => "replaced",
        RewriteOutcome::MissingConfig => "missing_config",
        RewriteOutcome::MissingPublicPath => "missing_public_path",
        RewriteOutcome::ChunkNotFound { .. } => "chunk_not_found",
        RewriteOutcome::NoScriptFile { .. } => "no_script_file",
        RewriteOutcome::AssetUnresolved { .. } => "asset_unresolved",
        RewriteOutcome::FileNotFound { .. } => "file_not_found",
        RewriteOutcome::PatternMissing { .. } => "pattern_missing",
        RewriteOutcome::ReadError { .. } => "read_error",
        RewriteOutcome::WriteError { .. } => "write_error",
        RewriteOutcome::SnapshotError { .. } => "snapshot_error",
    }
}

pub fn render_report_md(report: &RewriteReport) -> String {
    let mut out = String::new();
    out.push_str("# chunkpatch rewrite\n\n");
    out.push_str(&format!("- Status: `{:?}`\n", report.verdict.status));
    out.push_str(&format!("- Outcome: {}\n", report.outcome.describe()));

    if let Some(change) = &report.change {
        out.push_str(&format!("- File: `{}`\n", change.path));
        out.push_str(&format!(
            "- Bytes: {} -> {}\n",
            change.before_bytes, change.after_bytes
        ));
        out.push_str(&format!("- Before sha256: `{}`\n", change.before_sha256));
        out.push_str(&format!("- After sha256: `{}`\n", change.after_sha256));
    }

    if let Some(artifacts) = &report.artifacts {
        if let Some(patch) = &artifacts.patch {
            out.push_str(&format!("- Patch: `{}`\n", patch));
        }
    }

    out
}
