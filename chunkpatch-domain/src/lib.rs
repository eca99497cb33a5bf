//! Domain logic: turn configuration + a build snapshot into a rewrite plan.
//!
//! This crate owns *what* should be rewritten and where. It does not own
//! *how* the edit is applied; that's the `chunkpatch-edit` crate. Nothing
//! here touches the filesystem, so planning is testable with a hand-built
//! snapshot.

mod plan;

pub use plan::{PlanError, plan_rewrite, quoted_pattern};
