use chunkpatch_types::config::RewriteConfig;
use chunkpatch_types::rewrite::RewritePlan;
use chunkpatch_types::snapshot::{BuildSnapshot, ChunkRecord};
use thiserror::Error;

/// Why a plan could not be produced. Every variant is terminal for the
/// invocation; the pipeline reports it and returns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("some mandatory option missing\n{usage}", usage = chunkpatch_types::config::USAGE)]
    MissingConfig,

    #[error(
        "output publicPath must be defined; it is only a placeholder to find and replace, \
         so pick a value distinctive enough that nothing else matches"
    )]
    MissingPublicPath,

    #[error("could not find chunk '{chunk}'")]
    ChunkNotFound { chunk: String },

    #[error("chunk '{chunk}' has no .js file to rewrite")]
    NoScriptFile { chunk: String },

    #[error("no on-disk location known for '{file}'")]
    AssetUnresolved { file: String },
}

/// The literal to search for: the public path the way bundlers serialize
/// string literals into emitted code.
pub fn quoted_pattern(public_path: &str) -> String {
    format!("\"{public_path}\"")
}

fn script_file(chunk: &ChunkRecord) -> Option<&str> {
    chunk
        .files
        .iter()
        .map(String::as_str)
        .find(|f| f.ends_with(".js"))
}

/// Validate the configuration and locate the rewrite target.
///
/// Pure lookup over the snapshot; the returned plan is all the edit engine
/// needs, so the snapshot is not held past this call.
pub fn plan_rewrite(
    config: &RewriteConfig,
    snapshot: &BuildSnapshot,
) -> Result<RewritePlan, PlanError> {
    if !config.is_valid() {
        return Err(PlanError::MissingConfig);
    }

    let public_path = snapshot
        .public_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or(PlanError::MissingPublicPath)?;

    let chunk = snapshot
        .chunk(&config.chunk_name)
        .ok_or_else(|| PlanError::ChunkNotFound {
            chunk: config.chunk_name.clone(),
        })?;

    let file = script_file(chunk).ok_or_else(|| PlanError::NoScriptFile {
        chunk: config.chunk_name.clone(),
    })?;

    let path = snapshot
        .asset_path(file)
        .ok_or_else(|| PlanError::AssetUnresolved {
            file: file.to_string(),
        })?;

    Ok(RewritePlan {
        chunk_name: chunk.name.clone(),
        file_name: file.to_string(),
        path,
        search_pattern: quoted_pattern(public_path),
        replacement: config.external_global.clone(),
    })
}
