//! Default filesystem-backed port implementations.

use crate::ports::{ArtifactWriter, SnapshotSource};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chunkpatch_stats::LoadedSnapshot;
use chunkpatch_types::snapshot::BuildSnapshot;
use fs_err as fs;

/// Loads the snapshot from the stats file via `chunkpatch_stats::load_stats`.
#[derive(Debug, Clone)]
pub struct FsSnapshotSource {
    pub stats_path: Utf8PathBuf,
}

impl FsSnapshotSource {
    pub fn new(stats_path: Utf8PathBuf) -> Self {
        Self { stats_path }
    }
}

impl SnapshotSource for FsSnapshotSource {
    fn load_snapshot(&self) -> LoadedSnapshot {
        chunkpatch_stats::load_stats(&self.stats_path)
    }
}

/// Hand-built snapshot for embedding and testing.
#[derive(Debug, Clone)]
pub struct InMemorySnapshotSource {
    snapshot: BuildSnapshot,
}

impl InMemorySnapshotSource {
    pub fn new(snapshot: BuildSnapshot) -> Self {
        Self { snapshot }
    }
}

impl SnapshotSource for InMemorySnapshotSource {
    fn load_snapshot(&self) -> LoadedSnapshot {
        LoadedSnapshot {
            path: Utf8PathBuf::from("<memory>"),
            snapshot: Ok(self.snapshot.clone()),
        }
    }
}

/// Artifact writer backed by the real filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsArtifactWriter;

impl ArtifactWriter for FsArtifactWriter {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create {}", path))
    }
}
