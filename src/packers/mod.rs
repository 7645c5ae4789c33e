//! Packer back ends
//!
//! A packer turns a pack's named input files into physical output files in
//! the destination directory. Back ends are registered under a type name and
//! looked up by the planner (membership), executor (dispatch) and pruner
//! (virtual-children capability).
//!
//! Built-in packers:
//! - `raw`: verbatim per-file copy, `src/packers/raw.rs`
//! - `bundle`: single length-prefixed archive, `src/packers/bundle.rs`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::PackrResult;

mod bundle;
mod raw;

pub use bundle::BundlePacker;
pub use raw::RawPacker;

/// A pluggable pack back end.
pub trait Packer {
    /// Produce the physical output files for `pack_id` in `dest`.
    ///
    /// `files` maps logical file ids to absolute source paths. A packer may
    /// merge several logical ids into one physical file, but the returned
    /// logical-id-to-filename mapping must cover every input id so the
    /// executor can route absorbed outputs correctly.
    fn pack(
        &self,
        pack_id: &str,
        files: &BTreeMap<String, PathBuf>,
        dest: &Path,
    ) -> PackrResult<BTreeMap<String, String>>;

    /// Whether packs this packer absorbs become redundant on disk.
    ///
    /// When true, the pruner may delete the standalone output of every pack
    /// this packer's packs include, unless a recorded dependent retains it.
    fn virtual_children(&self) -> bool {
        false
    }
}

/// Registry mapping packer type names to back ends.
///
/// Unknown lookups return `None`: the planner drops the offending node with
/// a warning, while the executor treats the same situation as fatal.
pub struct PackerRegistry {
    packers: BTreeMap<String, Box<dyn Packer>>,
}

impl PackerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            packers: BTreeMap::new(),
        }
    }

    /// Register a packer under a type name, replacing any previous entry
    pub fn register(&mut self, kind: impl Into<String>, packer: Box<dyn Packer>) {
        self.packers.insert(kind.into(), packer);
    }

    /// Look up a packer by type name
    pub fn get(&self, kind: &str) -> Option<&dyn Packer> {
        self.packers.get(kind).map(|p| p.as_ref())
    }

    /// Whether a packer is registered under `kind`
    pub fn contains(&self, kind: &str) -> bool {
        self.packers.contains_key(kind)
    }
}

impl Default for PackerRegistry {
    /// Registry with the built-in `raw` and `bundle` packers
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("raw", Box::new(RawPacker::new()));
        registry.register("bundle", Box::new(BundlePacker::new()));
        registry
    }
}
