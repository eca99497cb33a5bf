//! Edit engine for chunkpatch rewrite plans.
//!
//! Responsibilities:
//! - Read the target file (single read attempt, no exists-then-read race).
//! - Replace every occurrence of the search pattern.
//! - Write the result back, recording before/after checksums.
//! - Generate a unified diff preview.

use camino::Utf8Path;
use chunkpatch_types::rewrite::{FileChange, RewriteApply, RewritePlan};
use diffy::PatchFormatter;
use fs_err as fs;
use sha2::{Digest, Sha256};
use tracing::debug;

mod error;

pub use error::ApplyError;

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Run every step except the final write. The diff and change record are
    /// still produced.
    pub dry_run: bool,
}

/// Apply a plan to the file on disk.
///
/// Zero occurrences of the pattern is not an error: the apply comes back with
/// `occurrences == 0` and the file untouched, which makes a second run over
/// an already-rewritten file a defined no-op. Read and write are the only
/// fallible steps; a write failure after a successful read can leave the
/// file partially written, accepted because the target is a rebuildable
/// build artifact.
pub fn apply_rewrite(plan: &RewritePlan, opts: &ApplyOptions) -> Result<RewriteApply, ApplyError> {
    debug!(path = %plan.path, pattern = %plan.search_pattern, "attempting rewrite");

    let before = match fs::read_to_string(&plan.path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApplyError::FileNotFound {
                path: plan.path.clone(),
            });
        }
        Err(e) => {
            return Err(ApplyError::Read {
                path: plan.path.clone(),
                source: e,
            });
        }
    };

    let occurrences = before.matches(&plan.search_pattern).count() as u64;
    if occurrences == 0 {
        return Ok(RewriteApply {
            occurrences: 0,
            written: false,
            change: None,
            patch: String::new(),
        });
    }

    let after = before.replace(&plan.search_pattern, &plan.replacement);
    let patch = render_patch(&plan.path, &before, &after);
    let change = file_change(&plan.path, &before, &after);

    if !opts.dry_run {
        fs::write(&plan.path, &after).map_err(|e| ApplyError::Write {
            path: plan.path.clone(),
            source: e,
        })?;
    }

    Ok(RewriteApply {
        occurrences,
        written: !opts.dry_run,
        change: Some(change),
        patch,
    })
}

fn file_change(path: &Utf8Path, before: &str, after: &str) -> FileChange {
    let before_bytes = before.as_bytes();
    let after_bytes = after.as_bytes();
    FileChange {
        path: path.to_string(),
        before_sha256: sha256_hex(before_bytes),
        after_sha256: sha256_hex(after_bytes),
        before_bytes: before_bytes.len() as u64,
        after_bytes: after_bytes.len() as u64,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn render_patch(path: &Utf8Path, old: &str, new: &str) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(old, new);
    out.push_str(&formatter.fmt_patch(&patch).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }

    out
}
