//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use chunkpatch_stats::LoadedSnapshot;

/// Source of the build snapshot.
pub trait SnapshotSource {
    fn load_snapshot(&self) -> LoadedSnapshot;
}

/// Report-artifact write operations.
pub trait ArtifactWriter {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
