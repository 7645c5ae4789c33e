//! Virtual-pack pruner
//!
//! After every pack has been executed, decides which packs were purely
//! intermediate and deletes their physical output files. Two-pass:
//!
//! 1. Mark: a pack whose packer absorbs its includes (`virtual_children`)
//!    claims each included pack's unset flag as `Virtual`; independently,
//!    every id recorded in a `dependencies` list is forced to `Retained`,
//!    which overrides any virtual claim.
//! 2. Delete: every pack left flagged `Virtual` has its output files
//!    removed from the destination directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PackrResult;
use crate::models::PackGraph;
use crate::packers::PackerRegistry;

/// Run both prune phases and return the deleted paths.
pub fn prune(
    graph: &mut PackGraph,
    dest_root: &Path,
    registry: &PackerRegistry,
) -> PackrResult<Vec<PathBuf>> {
    mark(graph, registry);
    delete_virtual(graph, dest_root)
}

/// Mark phase. Pure graph bookkeeping, no I/O.
pub fn mark(graph: &mut PackGraph, registry: &PackerRegistry) {
    let mut absorbed: Vec<String> = Vec::new();
    let mut retained: Vec<String> = Vec::new();

    for (_, pack) in graph.iter() {
        let absorbs = registry
            .get(&pack.kind)
            .map(|p| p.virtual_children())
            .unwrap_or(false);
        if absorbs {
            absorbed.extend(pack.includes.iter().cloned());
        }
        retained.extend(pack.dependencies.iter().cloned());
    }

    for id in absorbed {
        if let Some(pack) = graph.get_mut(&id) {
            pack.virtuality.mark_virtual();
        }
    }
    // retention always wins, so it is applied last
    for id in retained {
        if let Some(pack) = graph.get_mut(&id) {
            pack.virtuality.retain();
        }
    }
}

/// Delete phase: remove the output files of every pack flagged virtual.
pub fn delete_virtual(graph: &PackGraph, dest_root: &Path) -> PackrResult<Vec<PathBuf>> {
    let mut deleted = Vec::new();

    for (_, pack) in graph.iter() {
        if !pack.virtuality.is_virtual() {
            continue;
        }
        // several logical ids may share one physical output
        let outputs: BTreeSet<&String> = pack.output_files.values().collect();
        for name in outputs {
            let path = dest_root.join(name);
            fs::remove_file(&path)?;
            deleted.push(path);
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackrResult;
    use crate::models::{Pack, Virtuality};
    use crate::packers::Packer;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    struct Nop {
        virtual_children: bool,
    }

    impl Packer for Nop {
        fn pack(
            &self,
            _pack_id: &str,
            _files: &BTreeMap<String, PathBuf>,
            _dest: &Path,
        ) -> PackrResult<BTreeMap<String, String>> {
            Ok(BTreeMap::new())
        }
        fn virtual_children(&self) -> bool {
            self.virtual_children
        }
    }

    fn registry() -> PackerRegistry {
        let mut registry = PackerRegistry::new();
        registry.register(
            "bundle",
            Box::new(Nop {
                virtual_children: true,
            }),
        );
        registry.register(
            "raw",
            Box::new(Nop {
                virtual_children: false,
            }),
        );
        registry
    }

    fn executed_pack(kind: &str, includes: &[&str], outputs: &[&str]) -> Pack {
        let mut pack = Pack::new(kind);
        pack.includes = includes.iter().map(|s| s.to_string()).collect();
        pack.packed = true;
        for name in outputs {
            pack.output_files.insert(name.to_string(), name.to_string());
        }
        pack
    }

    #[test]
    fn absorbing_packer_marks_includes_virtual() {
        let mut graph = PackGraph::new();
        graph.merge_insert("app", executed_pack("bundle", &["app-sub"], &["app.pack"]));
        graph.merge_insert("app-sub", executed_pack("bundle", &[], &["app-sub.pack"]));

        mark(&mut graph, &registry());

        assert_eq!(graph.get("app-sub").unwrap().virtuality, Virtuality::Virtual);
        assert_eq!(graph.get("app").unwrap().virtuality, Virtuality::Unknown);
    }

    #[test]
    fn non_absorbing_packer_marks_nothing() {
        let mut graph = PackGraph::new();
        graph.merge_insert("top", executed_pack("raw", &["inner"], &["top.out"]));
        graph.merge_insert("inner", executed_pack("raw", &[], &["inner.out"]));

        mark(&mut graph, &registry());

        assert_eq!(graph.get("inner").unwrap().virtuality, Virtuality::Unknown);
    }

    #[test]
    fn recorded_dependents_force_retention() {
        let mut graph = PackGraph::new();
        let mut app = executed_pack("bundle", &["app-mid"], &["app.pack"]);
        app.dependencies.clear();
        graph.merge_insert("app", app);

        // the middle pack both includes something and is included itself
        let mut mid = executed_pack("bundle", &["app-mid-leaf"], &["app-mid.pack"]);
        mid.dependencies.push("app".to_string());
        graph.merge_insert("app-mid", mid);

        let mut leaf = executed_pack("bundle", &[], &["app-mid-leaf.pack"]);
        leaf.dependencies.push("app-mid".to_string());
        graph.merge_insert("app-mid-leaf", leaf);

        mark(&mut graph, &registry());

        // leaf's recorded dependent keeps the middle pack on disk even
        // though app's bundle packer claimed it as virtual
        assert_eq!(
            graph.get("app-mid").unwrap().virtuality,
            Virtuality::Retained
        );
        assert_eq!(
            graph.get("app-mid-leaf").unwrap().virtuality,
            Virtuality::Virtual
        );
    }

    #[test]
    fn delete_removes_only_virtual_outputs() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("app.pack"), b"app").unwrap();
        std::fs::write(dir.path().join("app-sub.pack"), b"sub").unwrap();

        let mut graph = PackGraph::new();
        graph.merge_insert("app", executed_pack("bundle", &["app-sub"], &["app.pack"]));
        let mut sub = executed_pack("bundle", &[], &["app-sub.pack"]);
        sub.dependencies.push("app".to_string());
        graph.merge_insert("app-sub", sub);

        let deleted = prune(&mut graph, dir.path(), &registry()).unwrap();

        assert_eq!(deleted, vec![dir.path().join("app-sub.pack")]);
        assert!(!dir.path().join("app-sub.pack").exists());
        assert!(dir.path().join("app.pack").exists());
    }

    #[test]
    fn shared_physical_output_is_deleted_once() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("merged.pack"), b"all").unwrap();

        let mut graph = PackGraph::new();
        let mut pack = Pack::new("bundle");
        pack.packed = true;
        pack.output_files
            .insert("a".to_string(), "merged.pack".to_string());
        pack.output_files
            .insert("b".to_string(), "merged.pack".to_string());
        pack.virtuality = Virtuality::Virtual;
        graph.merge_insert("merged", pack);

        let deleted = delete_virtual(&graph, dir.path()).unwrap();

        assert_eq!(deleted.len(), 1);
        assert!(!dir.path().join("merged.pack").exists());
    }
}
