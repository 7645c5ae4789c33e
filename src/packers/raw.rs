//! Raw packer: verbatim per-file copy
//!
//! The reference back end. Copies each input file to the destination under
//! its original basename, one physical output per logical id. Nothing it
//! contains is ever considered redundant (`virtual_children` is false).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PackrResult;
use crate::packers::Packer;

#[derive(Debug, Default)]
pub struct RawPacker;

impl RawPacker {
    pub fn new() -> Self {
        Self
    }
}

impl Packer for RawPacker {
    fn pack(
        &self,
        _pack_id: &str,
        files: &BTreeMap<String, PathBuf>,
        dest: &Path,
    ) -> PackrResult<BTreeMap<String, String>> {
        let mut out = BTreeMap::new();

        for (id, file) in files {
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| id.clone());
            let target = dest.join(&filename);

            // an absorbed output already lives in dest under its final name
            if *file != target {
                fs::copy(file, &target)?;
            }
            out.insert(id.clone(), filename);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_files_under_basename() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        fs::write(src.path().join("hero.png"), b"pixels").unwrap();
        fs::write(src.path().join("map.json"), b"{}").unwrap();

        let mut files = BTreeMap::new();
        files.insert("hero".to_string(), src.path().join("hero.png"));
        files.insert("map".to_string(), src.path().join("map.json"));

        let out = RawPacker::new().pack("assets", &files, dest.path()).unwrap();

        assert_eq!(out["hero"], "hero.png");
        assert_eq!(out["map"], "map.json");
        assert_eq!(
            fs::read(dest.path().join("hero.png")).unwrap(),
            b"pixels".to_vec()
        );
    }

    #[test]
    fn in_place_input_is_left_alone() {
        let dest = tempdir().unwrap();
        fs::write(dest.path().join("done.pack"), b"payload").unwrap();

        let mut files = BTreeMap::new();
        files.insert("done.pack".to_string(), dest.path().join("done.pack"));

        let out = RawPacker::new().pack("assets", &files, dest.path()).unwrap();

        assert_eq!(out["done.pack"], "done.pack");
        assert_eq!(
            fs::read(dest.path().join("done.pack")).unwrap(),
            b"payload".to_vec()
        );
    }

    #[test]
    fn missing_source_is_fatal() {
        let dest = tempdir().unwrap();
        let mut files = BTreeMap::new();
        files.insert("ghost".to_string(), PathBuf::from("/nonexistent/ghost.png"));

        let result = RawPacker::new().pack("assets", &files, dest.path());
        assert!(result.is_err());
    }
}
