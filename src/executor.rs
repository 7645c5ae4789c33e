//! Pack executor
//!
//! Resolves a pack and everything it transitively includes, depth-first:
//! includes are fully packed strictly before their including pack runs, the
//! included outputs are merged into the includer's inputs, and a reverse
//! dependency edge is recorded on every included pack afterwards. Execution
//! is idempotent per pack id via the `packed` guard, so callers may simply
//! invoke it for every id in the graph.
//!
//! Failure semantics: no retries and no cleanup of partial output; any
//! packer error aborts the run (callers pre-clean the destination, so a
//! failed run is safe to re-attempt from scratch).

use std::path::{Path, PathBuf};

use crate::error::{PackrError, PackrResult};
use crate::models::PackGraph;
use crate::packers::PackerRegistry;

/// Execute the pack `pack_id` and, first, every pack it includes.
pub fn execute(
    graph: &mut PackGraph,
    pack_id: &str,
    src_root: &Path,
    dest_root: &Path,
    registry: &PackerRegistry,
) -> PackrResult<()> {
    let (kind, includes) = {
        let pack = graph
            .get_mut(pack_id)
            .ok_or_else(|| PackrError::PackNotFound {
                id: pack_id.to_string(),
            })?;
        if pack.packed {
            return Ok(());
        }

        // member files become absolute before the packer sees them
        let files = std::mem::take(&mut pack.files);
        pack.files = files
            .into_iter()
            .map(|(id, path)| (id, src_root.join(path)))
            .collect();

        (pack.kind.clone(), pack.includes.clone())
    };

    for include_id in &includes {
        if !graph.contains(include_id) {
            return Err(PackrError::MissingInclude {
                pack: pack_id.to_string(),
                include: include_id.clone(),
            });
        }
        execute(graph, include_id, src_root, dest_root, registry)?;

        // The included pack's finished artifacts become raw inputs of this
        // pack, keyed by output file name. List order matters: later
        // includes overwrite colliding keys of earlier ones.
        let absorbed: Vec<(String, PathBuf)> = match graph.get(include_id) {
            Some(included) => included
                .output_files
                .iter()
                .filter_map(|(logical_id, out_name)| {
                    included
                        .absolute_files
                        .get(logical_id)
                        .map(|abs| (out_name.clone(), abs.clone()))
                })
                .collect(),
            None => Vec::new(),
        };
        if let Some(pack) = graph.get_mut(pack_id) {
            pack.files.extend(absorbed);
        }
    }

    let packer = registry
        .get(&kind)
        .ok_or_else(|| PackrError::UnknownPacker {
            kind: kind.clone(),
            pack: pack_id.to_string(),
        })?;

    let outputs = {
        let pack = graph.get(pack_id).ok_or_else(|| PackrError::PackNotFound {
            id: pack_id.to_string(),
        })?;
        packer.pack(pack_id, &pack.files, dest_root)?
    };

    if let Some(pack) = graph.get_mut(pack_id) {
        pack.absolute_files = outputs
            .iter()
            .map(|(id, name)| (id.clone(), dest_root.join(name)))
            .collect();
        pack.output_files = outputs;
        pack.packed = true;
    }

    // reverse edges, written only after every include has been executed
    for include_id in &includes {
        if let Some(included) = graph.get_mut(include_id) {
            included.dependencies.push(pack_id.to_string());
        }
    }

    Ok(())
}
