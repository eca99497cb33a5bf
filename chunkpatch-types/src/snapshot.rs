use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A narrow view of one completed bundler build.
///
/// chunkpatch tries hard to be *tolerant* when reading snapshots:
/// - Unknown fields are ignored.
/// - Optional fields may be absent.
///
/// The bundler that emitted the stats file should enforce stricter schema
/// compliance; chunkpatch's job is to be useful with the build "as found".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSnapshot {
    /// The static public path the bundler baked into emitted code. This is
    /// also the literal placeholder chunkpatch searches for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    /// Named output groups in emission order.
    #[serde(default)]
    pub chunks: Vec<ChunkRecord>,

    /// Emitted file name -> location on disk.
    #[serde(default)]
    pub assets: BTreeMap<String, Utf8PathBuf>,

    /// Root the bundler wrote into. Used to resolve a file name that has no
    /// entry in `assets`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<Utf8PathBuf>,
}

/// One named output group and the files it emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub name: String,

    #[serde(default)]
    pub files: Vec<String>,
}

impl BuildSnapshot {
    /// First chunk with the given name.
    pub fn chunk(&self, name: &str) -> Option<&ChunkRecord> {
        self.chunks.iter().find(|c| c.name == name)
    }

    /// Resolve an emitted file name to its on-disk location: the asset map
    /// wins, `output_dir` is the fallback.
    pub fn asset_path(&self, file: &str) -> Option<Utf8PathBuf> {
        if let Some(path) = self.assets.get(file) {
            return Some(path.clone());
        }
        self.output_dir.as_ref().map(|dir| dir.join(file))
    }
}
