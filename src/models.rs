//! Core data models for packr
//!
//! Defines the fundamental data structures used throughout packr:
//! - `TreeNode`: one scanned file or directory with its parsed packer type
//! - `Pack`: a named bundling unit with member files and include edges
//! - `PackGraph`: the id-keyed pack mapping produced by planning
//! - `Virtuality`: tri-state prune flag

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One file or directory discovered under the scan root.
///
/// `id` is the entry name with any `#type` suffix stripped (and, for files,
/// the filename extension stripped as well). When the name consists of a
/// suffix only (e.g. `#image`), the id falls back to the type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Name-derived identifier, unique within the parent's children
    pub id: String,

    /// Packer type tag parsed from the trailing `#tag` suffix; empty if absent
    pub kind: String,

    /// Whether this node is a directory
    pub is_dir: bool,

    /// Path of this node relative to the scan root
    pub rel_path: PathBuf,

    /// Child nodes keyed by id (empty for files)
    pub children: BTreeMap<String, TreeNode>,
}

impl TreeNode {
    /// Create a leaf or directory node without children
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        is_dir: bool,
        rel_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            is_dir,
            rel_path: rel_path.into(),
            children: BTreeMap::new(),
        }
    }
}

/// Prune decision for a pack.
///
/// Transition rules: `Unknown -> Virtual` is allowed; anything may move to
/// `Retained` and `Retained` is terminal; `Virtual -> Virtual` is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Virtuality {
    /// No prune decision made yet
    #[default]
    Unknown,
    /// Standalone output is redundant and may be deleted
    Virtual,
    /// Output must remain on disk
    Retained,
}

impl Virtuality {
    /// Claim an unset flag as virtual. `Retained` and `Virtual` are unchanged.
    pub fn mark_virtual(&mut self) {
        if *self == Virtuality::Unknown {
            *self = Virtuality::Virtual;
        }
    }

    /// Force retention. Always wins and is terminal.
    pub fn retain(&mut self) {
        *self = Virtuality::Retained;
    }

    /// Whether the pack's output files should be deleted
    pub fn is_virtual(self) -> bool {
        self == Virtuality::Virtual
    }
}

/// A named bundling unit.
///
/// `files` maps logical file ids to source paths: relative to the source
/// root during planning, absolute once execution has started. `includes`
/// is ordered and append-only; later includes overwrite colliding output
/// keys of earlier ones when absorbed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pack {
    /// Packer type that produces this pack; never empty after planning
    #[serde(rename = "type")]
    pub kind: String,

    /// Reverse include edges: ids of packs that absorbed this pack's output
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Ids of packs whose entire output is merged into this pack's inputs
    #[serde(default)]
    pub includes: Vec<String>,

    /// Logical file id -> source path
    #[serde(default)]
    pub files: BTreeMap<String, PathBuf>,

    /// Execution guard: a pack is executed at most once
    #[serde(skip)]
    pub packed: bool,

    /// Logical id -> output file name, populated by execution
    #[serde(skip)]
    pub output_files: BTreeMap<String, String>,

    /// Logical id -> absolute output path, populated by execution
    #[serde(skip)]
    pub absolute_files: BTreeMap<String, PathBuf>,

    /// Prune decision, populated by the pruner's mark phase
    #[serde(skip)]
    pub virtuality: Virtuality,
}

impl Pack {
    /// Create an empty pack of the given packer type
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// Mapping from pack id to `Pack`, produced by planning and mutated in
/// place by execution and pruning.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackGraph {
    packs: BTreeMap<String, Pack>,
}

impl PackGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Pack> {
        self.packs.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Pack> {
        self.packs.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.packs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// Iterate packs in deterministic (sorted id) order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Pack)> {
        self.packs.iter()
    }

    /// Pack ids in deterministic order
    pub fn ids(&self) -> Vec<String> {
        self.packs.keys().cloned().collect()
    }

    /// Insert `pack` under `id`, merging with any existing entry.
    ///
    /// Merge rule: the incoming type wins, includes and dependencies are
    /// concatenated in order, and the files maps are unioned with the
    /// incoming entries winning on key collision.
    pub fn merge_insert(&mut self, id: &str, pack: Pack) {
        match self.packs.get_mut(id) {
            Some(existing) => {
                existing.kind = pack.kind;
                existing.includes.extend(pack.includes);
                existing.dependencies.extend(pack.dependencies);
                existing.files.extend(pack.files);
            }
            None => {
                self.packs.insert(id.to_string(), pack);
            }
        }
    }
}
