//! Embeddable rewrite pipeline, extracted so hosts other than the CLI can
//! drive it. All filesystem access goes through the port traits.

mod adapters;
mod pipeline;
mod ports;
mod report;
mod settings;

pub use adapters::{FsArtifactWriter, FsSnapshotSource, InMemorySnapshotSource};
pub use pipeline::{RewriteRun, run_rewrite, write_artifacts};
pub use ports::{ArtifactWriter, SnapshotSource};
pub use report::{BANNER_PREFIX, banner_line, render_report_md};
pub use settings::RewriteSettings;
