//! Source tree scanner
//!
//! Recursively walks the source directory and produces a `TreeNode` tree.
//! Bundling intent is encoded in entry names: a trailing `#tag` suffix names
//! the packer type that should consume the node. Filesystem errors are fatal
//! and propagate unchanged; this stage performs no recovery.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{PackrError, PackrResult};
use crate::models::TreeNode;

/// Scan `root` into a tree of nodes.
///
/// The returned node is a synthetic directory root with an empty id and no
/// packer type; its children mirror the top-level entries of `root`.
pub fn scan(root: &Path) -> PackrResult<TreeNode> {
    if !root.is_dir() {
        return Err(PackrError::SourceNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut node = TreeNode::new("", "", true, "");
    node.children = scan_dir(root, Path::new(""))?;
    Ok(node)
}

fn scan_dir(dir: &Path, rel: &Path) -> PackrResult<BTreeMap<String, TreeNode>> {
    let mut children = BTreeMap::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // full metadata rather than the dirent type, so a symlinked
        // directory is scanned like the directory it points at
        let is_dir = fs::metadata(entry.path())?.is_dir();
        let rel_path = rel.join(&name);

        let (mut id, kind) = split_type_suffix(&name);
        if !is_dir {
            id = strip_extension(&id);
        }

        let mut node = TreeNode::new(id, kind, is_dir, rel_path);
        if is_dir {
            node.children = scan_dir(&entry.path(), &node.rel_path)?;
        }
        children.insert(node.id.clone(), node);
    }

    Ok(children)
}

/// Split a `name#tag` entry name into (id, type tag).
///
/// The tag starts after the last `#`. A name that is nothing but a suffix
/// (empty or whitespace-only prefix) takes the tag itself as its id, so a
/// node can be named entirely by its packer type.
fn split_type_suffix(name: &str) -> (String, String) {
    match name.rfind('#') {
        Some(pos) => {
            let id = name[..pos].trim();
            let kind = name[pos + 1..].to_string();
            if id.is_empty() {
                (kind.clone(), kind)
            } else {
                (id.to_string(), kind)
            }
        }
        None => (name.to_string(), String::new()),
    }
}

/// Drop a trailing `.ext` from a file id. Ids that are nothing but an
/// extension (e.g. `.gitignore`) are kept whole.
fn strip_extension(id: &str) -> String {
    match id.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < id.len() => id[..pos].to_string(),
        _ => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn split_suffix_basic() {
        assert_eq!(
            split_type_suffix("sprites#atlas"),
            ("sprites".to_string(), "atlas".to_string())
        );
        assert_eq!(
            split_type_suffix("plain"),
            ("plain".to_string(), String::new())
        );
    }

    #[test]
    fn split_suffix_empty_prefix_falls_back_to_tag() {
        assert_eq!(
            split_type_suffix("#image"),
            ("image".to_string(), "image".to_string())
        );
        assert_eq!(
            split_type_suffix("  #image"),
            ("image".to_string(), "image".to_string())
        );
    }

    #[test]
    fn split_suffix_uses_last_hash() {
        assert_eq!(
            split_type_suffix("a#b#c"),
            ("a#b".to_string(), "c".to_string())
        );
    }

    #[test]
    fn strip_extension_cases() {
        assert_eq!(strip_extension("icon.png"), "icon");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".gitignore"), ".gitignore");
        assert_eq!(strip_extension("trailing."), "trailing.");
    }

    #[cfg(unix)]
    #[test]
    fn scan_follows_directory_symlinks() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::fs::write(dir.path().join("real/hero.png"), "png").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("linked#atlas"))
            .unwrap();

        let root = scan(dir.path()).unwrap();

        let linked = &root.children["linked"];
        assert!(linked.is_dir);
        assert_eq!(linked.kind, "atlas");
        assert!(linked.children.contains_key("hero"));
    }

    #[test]
    fn scan_missing_root_fails() {
        let result = scan(Path::new("/nonexistent/assets"));
        assert!(matches!(result, Err(PackrError::SourceNotFound { .. })));
    }

    #[test]
    fn scan_builds_tree_with_types() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sprites#atlas")).unwrap();
        std::fs::write(dir.path().join("sprites#atlas/hero.png"), "png").unwrap();
        std::fs::write(dir.path().join("icon.png#image"), "png").unwrap();
        std::fs::write(dir.path().join("readme.txt"), "hello").unwrap();

        let root = scan(dir.path()).unwrap();

        assert!(root.is_dir);
        assert_eq!(root.children.len(), 3);

        let sprites = &root.children["sprites"];
        assert!(sprites.is_dir);
        assert_eq!(sprites.kind, "atlas");
        assert_eq!(sprites.rel_path, PathBuf::from("sprites#atlas"));
        assert_eq!(sprites.children.len(), 1);

        let hero = &sprites.children["hero"];
        assert!(!hero.is_dir);
        assert_eq!(hero.kind, "");
        assert_eq!(hero.rel_path, PathBuf::from("sprites#atlas/hero.png"));

        let icon = &root.children["icon"];
        assert_eq!(icon.kind, "image");

        let readme = &root.children["readme"];
        assert_eq!(readme.kind, "");
        assert_eq!(readme.rel_path, PathBuf::from("readme.txt"));
    }
}
