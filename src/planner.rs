//! Pack planner
//!
//! Turns a scanned tree into a pack graph: which files belong to which pack
//! and which packs reference which other packs. This is the principal
//! algorithmic component; the worked behaviors are pinned down by the tests
//! at the bottom of this module and by the CLI scenario tests.
//!
//! The walk is recursive and pre-order, but a node's pack id is settled
//! post-order from its children's results:
//! - a child that organized itself into a pack of its own becomes an
//!   *include* of this node's pack;
//! - a child whose suffix names an unknown packer is warned about and
//!   excluded from the plan entirely;
//! - any other child becomes a plain member file under its prefixed id;
//! - a lone file claimed by a packer collapses into a shared pack keyed by
//!   the packer type, so ungrouped siblings of one type end up together.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::models::{Pack, PackGraph, TreeNode};
use crate::packers::PackerRegistry;

/// Non-fatal planning warning surfaced to CLI users.
///
/// Emitted when a name suffix references a packer type with no registered
/// back end; the offending node is excluded from the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanWarning {
    /// The unknown packer type
    pub kind: String,
    /// Source-relative path of the offending node
    pub path: PathBuf,
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown packer: {} ({})", self.kind, self.path.display())
    }
}

/// Plan the scanned tree into a pack graph.
///
/// `default_kind` is the packer type a bare file (no `#type` suffix) falls
/// into when no ancestor directory has claimed it. Planning never touches
/// the filesystem and is idempotent for an unchanged tree.
pub fn plan(
    registry: &PackerRegistry,
    root: &TreeNode,
    default_kind: &str,
) -> (PackGraph, Vec<PlanWarning>) {
    let mut graph = PackGraph::new();
    let mut warnings = Vec::new();
    plan_node(registry, &mut graph, &mut warnings, root, "", default_kind);
    (graph, warnings)
}

/// Outcome of planning one node, from the parent's point of view.
enum Planned {
    /// The node organized itself into the named pack
    Pack(String),
    /// The node contributes to its parent as a plain member file
    Member,
    /// The node was excluded from the plan with a warning
    Dropped,
}

/// Plan one node.
fn plan_node(
    registry: &PackerRegistry,
    graph: &mut PackGraph,
    warnings: &mut Vec<PlanWarning>,
    node: &TreeNode,
    id: &str,
    default_kind: &str,
) -> Planned {
    // Effective packer type: an explicit suffix is honored verbatim (so an
    // unknown type warns and drops below); only a bare file inherits the
    // caller-supplied default.
    let kind = if !node.is_dir && node.kind.is_empty() {
        default_kind.to_string()
    } else {
        node.kind.clone()
    };
    let claimed = registry.contains(&kind);

    let mut files: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut includes: Vec<String> = Vec::new();

    for (name, child) in &node.children {
        let local_id = if id.is_empty() {
            name.clone()
        } else {
            format!("{id}-{name}")
        };
        // Once this node is claimed by a packer, descendants stop inheriting
        // a default: bare files below become plain members of this pack.
        let child_default = if claimed { "" } else { default_kind };

        match plan_node(registry, graph, warnings, child, &local_id, child_default) {
            Planned::Pack(ret) if ret != id => includes.push(ret),
            Planned::Pack(_) | Planned::Member => {
                files.insert(local_id, child.rel_path.clone());
            }
            Planned::Dropped => {}
        }
    }

    if claimed {
        let mut pack_id = id.to_string();

        // A lone file with nothing routed into it is stored as its own
        // singleton entry, and the pack is keyed by the packer type instead,
        // collapsing ungrouped same-type files into one shared pack.
        if !node.is_dir && files.is_empty() {
            files.insert(pack_id.clone(), node.rel_path.clone());
            pack_id = kind.clone();
        }

        let pack = Pack {
            kind,
            includes,
            files,
            ..Pack::default()
        };
        graph.merge_insert(&pack_id, pack);
        return Planned::Pack(pack_id);
    }

    if !kind.is_empty() {
        warnings.push(PlanWarning {
            kind,
            path: node.rel_path.clone(),
        });
        return Planned::Dropped;
    }
    Planned::Member
}
