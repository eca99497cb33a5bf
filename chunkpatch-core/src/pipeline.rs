//! The rewrite pipeline, extracted from the CLI.
//!
//! `run_rewrite` never panics and never propagates an error for a failed
//! rewrite: every failure mode becomes a terminal [`RewriteOutcome`] that is
//! logged and reported, so a host build step can keep going regardless.

use crate::ports::{ArtifactWriter, SnapshotSource};
use crate::report::{render_report_md, report_from_outcome};
use crate::settings::RewriteSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use chunkpatch_domain::{PlanError, plan_rewrite};
use chunkpatch_edit::{ApplyError, ApplyOptions, apply_rewrite};
use chunkpatch_types::report::{ReportArtifacts, RewriteReport, ToolInfo, VerdictStatus};
use chunkpatch_types::rewrite::{RewriteApply, RewriteOutcome};
use tracing::{error, info, warn};

/// Everything one invocation produced.
pub struct RewriteRun {
    pub outcome: RewriteOutcome,
    pub apply: Option<RewriteApply>,
    pub report: RewriteReport,
}

/// Run the rewrite pipeline: load the snapshot, plan, apply, report.
pub fn run_rewrite(
    settings: &RewriteSettings,
    source: &dyn SnapshotSource,
    tool: ToolInfo,
) -> RewriteRun {
    let started_at = Utc::now();

    let (outcome, apply) = execute(settings, source);

    match outcome.verdict_status() {
        VerdictStatus::Pass => info!("{}", outcome.describe()),
        VerdictStatus::Warn => warn!("{}", outcome.describe()),
        VerdictStatus::Fail | VerdictStatus::Unknown => error!("{}", outcome.describe()),
    }

    let report = report_from_outcome(&outcome, apply.as_ref(), tool, started_at);
    RewriteRun {
        outcome,
        apply,
        report,
    }
}

fn execute(
    settings: &RewriteSettings,
    source: &dyn SnapshotSource,
) -> (RewriteOutcome, Option<RewriteApply>) {
    // Checked before any I/O so an unconfigured run stays a pure no-op.
    if !settings.config.is_valid() {
        return (RewriteOutcome::MissingConfig, None);
    }

    let loaded = source.load_snapshot();
    let mut snapshot = match loaded.snapshot {
        Ok(s) => s,
        Err(e) => {
            return (
                RewriteOutcome::SnapshotError {
                    message: e.to_string(),
                },
                None,
            );
        }
    };

    if let Some(public_path) = &settings.public_path_override {
        snapshot.public_path = Some(public_path.clone());
    }

    let plan = match plan_rewrite(&settings.config, &snapshot) {
        Ok(plan) => plan,
        Err(e) => return (outcome_from_plan_error(e), None),
    };

    let opts = ApplyOptions {
        dry_run: settings.dry_run,
    };
    match apply_rewrite(&plan, &opts) {
        Ok(apply) if apply.occurrences == 0 => (
            RewriteOutcome::PatternMissing {
                path: plan.path.to_string(),
            },
            Some(apply),
        ),
        Ok(apply) => (
            RewriteOutcome::Replaced {
                file: plan.file_name,
                occurrences: apply.occurrences,
            },
            Some(apply),
        ),
        Err(e) => (outcome_from_apply_error(e), None),
    }
}

fn outcome_from_plan_error(err: PlanError) -> RewriteOutcome {
    match err {
        PlanError::MissingConfig => RewriteOutcome::MissingConfig,
        PlanError::MissingPublicPath => RewriteOutcome::MissingPublicPath,
        PlanError::ChunkNotFound { chunk } => RewriteOutcome::ChunkNotFound { chunk },
        PlanError::NoScriptFile { chunk } => RewriteOutcome::NoScriptFile { chunk },
        PlanError::AssetUnresolved { file } => RewriteOutcome::AssetUnresolved { file },
    }
}

fn outcome_from_apply_error(err: ApplyError) -> RewriteOutcome {
    match err {
        ApplyError::FileNotFound { path } => RewriteOutcome::FileNotFound {
            path: path.to_string(),
        },
        ApplyError::Read { path, source } => RewriteOutcome::ReadError {
            path: path.to_string(),
            message: source.to_string(),
        },
        ApplyError::Write { path, source } => RewriteOutcome::WriteError {
            path: path.to_string(),
            message: source.to_string(),
        },
    }
}

/// Write `report.json`, `rewrite.md`, and `patch.diff` to the output
/// directory.
pub fn write_artifacts(
    run: &RewriteRun,
    out_dir: &Utf8Path,
    writer: &dyn ArtifactWriter,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let mut report = run.report.clone();
    report.artifacts = Some(ReportArtifacts {
        patch: Some("patch.diff".to_string()),
        summary: Some("rewrite.md".to_string()),
    });

    let report_json = serde_json::to_string_pretty(&report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let summary_md = render_report_md(&report);
    writer.write_file(&out_dir.join("rewrite.md"), summary_md.as_bytes())?;

    let patch = run
        .apply
        .as_ref()
        .map(|a| a.patch.as_str())
        .unwrap_or_default();
    writer.write_file(&out_dir.join("patch.diff"), patch.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FsSnapshotSource, InMemorySnapshotSource};
    use camino::Utf8PathBuf;
    use chunkpatch_types::config::RewriteConfig;
    use chunkpatch_types::snapshot::{BuildSnapshot, ChunkRecord};
    use pretty_assertions::assert_eq;
    use std::collections::{BTreeMap, HashMap};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemArtifactWriter {
        files: Mutex<HashMap<String, Vec<u8>>>,
        dirs: Mutex<Vec<String>>,
    }

    impl ArtifactWriter for MemArtifactWriter {
        fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
            let key = path.as_str().replace('\\', "/");
            self.files
                .lock()
                .expect("lock files")
                .insert(key, contents.to_vec());
            Ok(())
        }

        fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
            let key = path.as_str().replace('\\', "/");
            self.dirs.lock().expect("lock dirs").push(key);
            Ok(())
        }
    }

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "chunkpatch".to_string(),
            version: Some("0.0.0-test".to_string()),
        }
    }

    fn config() -> RewriteConfig {
        RewriteConfig::new("window.__CDN__", "manifest")
    }

    /// Build dir with one emitted manifest file, plus a snapshot naming it.
    fn build_fixture(contents: &str) -> (TempDir, Utf8PathBuf, BuildSnapshot) {
        let td = tempfile::tempdir().expect("tempdir");
        let file = td.path().join("manifest.js");
        fs::write(&file, contents).expect("write manifest");
        let file = Utf8PathBuf::from_path_buf(file).expect("utf8 path");

        let snapshot = BuildSnapshot {
            public_path: Some("/static/v1/".to_string()),
            chunks: vec![ChunkRecord {
                name: "manifest".to_string(),
                files: vec!["manifest.js".to_string()],
            }],
            assets: BTreeMap::from([("manifest.js".to_string(), file.clone())]),
            output_dir: None,
        };
        (td, file, snapshot)
    }

    fn settings() -> RewriteSettings {
        RewriteSettings::new(Utf8PathBuf::from("stats.json"), config())
    }

    #[test]
    fn rewrites_the_manifest_and_passes() {
        let (_td, file, snapshot) = build_fixture("var p=\"/static/v1/\";");
        let source = InMemorySnapshotSource::new(snapshot);

        let run = run_rewrite(&settings(), &source, tool());

        assert_eq!(
            run.outcome,
            RewriteOutcome::Replaced {
                file: "manifest.js".to_string(),
                occurrences: 1
            }
        );
        assert_eq!(run.report.verdict.status, VerdictStatus::Pass);
        assert_eq!(
            fs::read_to_string(file.as_std_path()).expect("read back"),
            "var p=window.__CDN__;"
        );
        assert!(run.report.change.is_some());
    }

    #[test]
    fn missing_config_is_a_pure_no_op() {
        let (_td, file, snapshot) = build_fixture("var p=\"/static/v1/\";");
        let source = InMemorySnapshotSource::new(snapshot);

        let mut settings = settings();
        settings.config.external_global = String::new();
        let run = run_rewrite(&settings, &source, tool());

        assert_eq!(run.outcome, RewriteOutcome::MissingConfig);
        assert_eq!(
            fs::read_to_string(file.as_std_path()).expect("read back"),
            "var p=\"/static/v1/\";"
        );
    }

    #[test]
    fn missing_public_path_stops_before_any_file_io() {
        let (_td, file, mut snapshot) = build_fixture("var p=\"/static/v1/\";");
        snapshot.public_path = None;
        let source = InMemorySnapshotSource::new(snapshot);

        let run = run_rewrite(&settings(), &source, tool());

        assert_eq!(run.outcome, RewriteOutcome::MissingPublicPath);
        assert!(run.apply.is_none());
        assert_eq!(
            fs::read_to_string(file.as_std_path()).expect("read back"),
            "var p=\"/static/v1/\";"
        );
    }

    #[test]
    fn unknown_chunk_is_reported_without_touching_files() {
        let (_td, file, snapshot) = build_fixture("var p=\"/static/v1/\";");
        let source = InMemorySnapshotSource::new(snapshot);

        let mut settings = settings();
        settings.config.chunk_name = "runtime".to_string();
        let run = run_rewrite(&settings, &source, tool());

        assert_eq!(
            run.outcome,
            RewriteOutcome::ChunkNotFound {
                chunk: "runtime".to_string()
            }
        );
        assert_eq!(run.report.verdict.status, VerdictStatus::Warn);
        assert_eq!(
            fs::read_to_string(file.as_std_path()).expect("read back"),
            "var p=\"/static/v1/\";"
        );
    }

    #[test]
    fn chunk_without_script_file_is_reported() {
        let (_td, _file, mut snapshot) = build_fixture("var p=\"/static/v1/\";");
        snapshot.chunks[0].files = vec!["manifest.css".to_string()];
        let source = InMemorySnapshotSource::new(snapshot);

        let run = run_rewrite(&settings(), &source, tool());

        assert_eq!(
            run.outcome,
            RewriteOutcome::NoScriptFile {
                chunk: "manifest".to_string()
            }
        );
    }

    #[test]
    fn missing_file_on_disk_is_file_not_found() {
        let (td, file, mut snapshot) = build_fixture("var p=\"/static/v1/\";");
        let gone = Utf8PathBuf::from_path_buf(td.path().join("gone.js")).expect("utf8 path");
        snapshot
            .assets
            .insert("manifest.js".to_string(), gone.clone());
        let source = InMemorySnapshotSource::new(snapshot);

        let run = run_rewrite(&settings(), &source, tool());

        assert_eq!(
            run.outcome,
            RewriteOutcome::FileNotFound {
                path: gone.to_string()
            }
        );
        assert_eq!(run.report.verdict.status, VerdictStatus::Fail);
        // The real manifest was never written to.
        assert_eq!(
            fs::read_to_string(file.as_std_path()).expect("read back"),
            "var p=\"/static/v1/\";"
        );
    }

    #[test]
    fn second_run_reports_pattern_missing_and_changes_nothing() {
        let (_td, file, snapshot) = build_fixture("var p=\"/static/v1/\";");
        let source = InMemorySnapshotSource::new(snapshot);

        let first = run_rewrite(&settings(), &source, tool());
        assert!(first.outcome.is_replaced());
        let after_first = fs::read_to_string(file.as_std_path()).expect("read back");

        let second = run_rewrite(&settings(), &source, tool());
        assert_eq!(
            second.outcome,
            RewriteOutcome::PatternMissing {
                path: file.to_string()
            }
        );
        assert_eq!(second.report.verdict.status, VerdictStatus::Warn);
        assert_eq!(
            fs::read_to_string(file.as_std_path()).expect("read back"),
            after_first
        );
    }

    #[test]
    fn dry_run_produces_a_patch_but_writes_nothing() {
        let (_td, file, snapshot) = build_fixture("var p=\"/static/v1/\";");
        let source = InMemorySnapshotSource::new(snapshot);

        let mut settings = settings();
        settings.dry_run = true;
        let run = run_rewrite(&settings, &source, tool());

        assert!(run.outcome.is_replaced());
        let apply = run.apply.expect("apply record");
        assert!(!apply.written);
        assert!(apply.patch.contains("+var p=window.__CDN__;"));
        assert_eq!(
            fs::read_to_string(file.as_std_path()).expect("read back"),
            "var p=\"/static/v1/\";"
        );
    }

    #[test]
    fn public_path_override_wins_over_the_snapshot() {
        let (_td, file, mut snapshot) = build_fixture("var p=\"/cdn-placeholder/\";");
        snapshot.public_path = Some("/static/v1/".to_string());
        let source = InMemorySnapshotSource::new(snapshot);

        let mut settings = settings();
        settings.public_path_override = Some("/cdn-placeholder/".to_string());
        let run = run_rewrite(&settings, &source, tool());

        assert!(run.outcome.is_replaced());
        assert_eq!(
            fs::read_to_string(file.as_std_path()).expect("read back"),
            "var p=window.__CDN__;"
        );
    }

    #[test]
    fn unreadable_stats_file_is_a_snapshot_error() {
        let td = tempfile::tempdir().expect("tempdir");
        let stats = Utf8PathBuf::from_path_buf(td.path().join("stats.json")).expect("utf8 path");
        let source = FsSnapshotSource::new(stats);

        let run = run_rewrite(&settings(), &source, tool());

        assert!(matches!(run.outcome, RewriteOutcome::SnapshotError { .. }));
        assert_eq!(run.report.verdict.status, VerdictStatus::Fail);
    }

    #[test]
    fn write_artifacts_writes_expected_files() {
        let (_td, _file, snapshot) = build_fixture("var p=\"/static/v1/\";");
        let source = InMemorySnapshotSource::new(snapshot);
        let run = run_rewrite(&settings(), &source, tool());

        let writer = MemArtifactWriter::default();
        let out_dir = Utf8PathBuf::from("out");
        write_artifacts(&run, &out_dir, &writer).expect("write artifacts");

        let files = writer.files.lock().expect("files");
        assert!(files.contains_key("out/report.json"));
        assert!(files.contains_key("out/rewrite.md"));
        assert!(files.contains_key("out/patch.diff"));

        let report: serde_json::Value =
            serde_json::from_slice(files.get("out/report.json").expect("report json"))
                .expect("parse report");
        assert_eq!(report["schema"], "chunkpatch.report.v1");
        assert_eq!(report["outcome"]["kind"], "replaced");
        assert_eq!(report["artifacts"]["patch"], "patch.diff");

        let patch = files.get("out/patch.diff").expect("patch");
        assert!(!patch.is_empty());
    }
}
