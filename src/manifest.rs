//! Asset manifest and plan serialization
//!
//! Two documents leave a run:
//! - the *plan* (pack id -> type/dependencies/includes/files), written as
//!   YAML by `packr plan` and loadable by a later `packr pack --plan`;
//! - the *asset manifest* (`manifest.json` in the destination), describing
//!   every executed pack plus a flat inventory of the files remaining in
//!   the destination after pruning, tagged with content kind and byte size.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PackrError, PackrResult};
use crate::models::{Pack, PackGraph};

/// One executed pack as recorded in the manifest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ManifestPack {
    #[serde(rename = "type")]
    pub kind: String,
    pub dependencies: Vec<String>,
    pub includes: Vec<String>,
    /// Logical id -> output file name
    pub files: BTreeMap<String, String>,
}

impl From<&Pack> for ManifestPack {
    fn from(pack: &Pack) -> Self {
        Self {
            kind: pack.kind.clone(),
            dependencies: pack.dependencies.clone(),
            includes: pack.includes.clone(),
            files: pack.output_files.clone(),
        }
    }
}

/// Inventory entry for one file in the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub size: u64,
}

/// The manifest written once, wholesale, at the end of a run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    pub packs: BTreeMap<String, ManifestPack>,
    pub files: BTreeMap<String, FileInfo>,
}

impl AssetManifest {
    /// Record every pack of an executed graph; the file inventory is filled
    /// in separately once pruning has settled what remains on disk.
    pub fn from_graph(graph: &PackGraph) -> Self {
        Self {
            packs: graph
                .iter()
                .map(|(id, pack)| (id.clone(), ManifestPack::from(pack)))
                .collect(),
            files: BTreeMap::new(),
        }
    }

    /// Write the manifest as pretty JSON, atomically (tempfile + rename).
    pub fn write(&self, path: &Path) -> PackrResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(path).map_err(|e| PackrError::Io(e.error))?;
        Ok(())
    }
}

/// Serialize a pack graph as a YAML plan document.
pub fn plan_to_yaml(graph: &PackGraph) -> PackrResult<String> {
    Ok(serde_yaml_ng::to_string(graph)?)
}

/// Load a pack graph from a YAML plan document.
pub fn plan_from_yaml(yaml: &str) -> PackrResult<PackGraph> {
    Ok(serde_yaml_ng::from_str(yaml)?)
}

/// Walk the destination directory and build the file inventory.
///
/// Keys are destination-relative paths with forward slashes; entries carry
/// the inferred content kind and the on-disk byte size.
pub fn inventory(dest: &Path) -> PackrResult<BTreeMap<String, FileInfo>> {
    let mut files = BTreeMap::new();

    let walker = ignore::WalkBuilder::new(dest).standard_filters(false).build();
    for entry in walker {
        let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let rel = path.strip_prefix(dest).unwrap_or(path);
        let key = rel.to_string_lossy().replace('\\', "/");
        let size = entry
            .metadata()
            .map_err(|e| std::io::Error::other(e.to_string()))?
            .len();
        files.insert(
            key,
            FileInfo {
                kind: content_kind(path),
                size,
            },
        );
    }

    Ok(files)
}

/// Infer a content category from a file extension.
pub fn content_kind(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    match ext.as_str() {
        "jpeg" | "jpg" | "png" | "gif" => "image".to_string(),
        "json" => "json".to_string(),
        "html" | "txt" => "text".to_string(),
        "xml" => "xml".to_string(),
        "pack" => "arraybuffer".to_string(),
        other => other.to_string(),
    }
}
