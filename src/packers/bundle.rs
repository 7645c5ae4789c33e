//! Bundle packer: single-archive back end
//!
//! Merges all input files into one `<pack_id>.pack` archive of
//! length-prefixed entries. Because the archive fully absorbs whatever it
//! includes, packs consumed by a bundle are virtual children: their
//! standalone outputs are deletable once absorbed.
//!
//! Entry layout, repeated per file in id order:
//!   u32 LE id length | id bytes (UTF-8) | u64 LE data length | data bytes

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::PackrResult;
use crate::packers::Packer;

#[derive(Debug, Default)]
pub struct BundlePacker;

impl BundlePacker {
    pub fn new() -> Self {
        Self
    }
}

impl Packer for BundlePacker {
    fn pack(
        &self,
        pack_id: &str,
        files: &BTreeMap<String, PathBuf>,
        dest: &Path,
    ) -> PackrResult<BTreeMap<String, String>> {
        let filename = format!("{pack_id}.pack");
        let mut archive = fs::File::create(dest.join(&filename))?;

        let mut out = BTreeMap::new();
        for (id, file) in files {
            let data = fs::read(file)?;
            archive.write_all(&(id.len() as u32).to_le_bytes())?;
            archive.write_all(id.as_bytes())?;
            archive.write_all(&(data.len() as u64).to_le_bytes())?;
            archive.write_all(&data)?;
            out.insert(id.clone(), filename.clone());
        }
        archive.flush()?;

        Ok(out)
    }

    fn virtual_children(&self) -> bool {
        true
    }
}
