//! Full-run orchestration
//!
//! `PackPipeline` wires the stages together: clean the destination, scan and
//! plan (or load a previously written plan), execute every pack in the
//! graph, prune absorbed packs, inventory what remains and write the asset
//! manifest. Everything is sequential; execution order correctness depends
//! on includes finishing before their including pack runs.

use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::PackrResult;
use crate::executor::execute;
use crate::manifest::{self, AssetManifest};
use crate::models::PackGraph;
use crate::packers::PackerRegistry;
use crate::planner::{plan, PlanWarning};
use crate::pruner;
use crate::scanner::scan;

/// Outcome of a full `pack` run
#[derive(Debug)]
pub struct RunReport {
    /// Non-fatal planning warnings (unknown packer suffixes)
    pub warnings: Vec<PlanWarning>,
    /// Output files deleted by the pruner
    pub deleted: Vec<PathBuf>,
    /// The manifest as written to the destination
    pub manifest: AssetManifest,
}

/// Scan/plan/execute/prune pipeline for one source tree.
pub struct PackPipeline {
    source: PathBuf,
    dest: PathBuf,
    default_kind: String,
    manifest_name: String,
    keep_virtual: bool,
    registry: PackerRegistry,
}

impl PackPipeline {
    /// Pipeline with the built-in packer registry
    pub fn new(config: &Config) -> Self {
        Self {
            source: config.source.clone(),
            dest: config.dest.clone(),
            default_kind: config.default_kind.clone(),
            manifest_name: config.manifest.clone(),
            keep_virtual: false,
            registry: PackerRegistry::default(),
        }
    }

    /// Replace the packer registry (custom back ends)
    pub fn with_registry(mut self, registry: PackerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Skip the pruner's delete phase (marking still happens)
    pub fn with_keep_virtual(mut self, keep_virtual: bool) -> Self {
        self.keep_virtual = keep_virtual;
        self
    }

    /// Scan the source tree and plan it into a pack graph.
    pub fn plan(&self) -> PackrResult<(PackGraph, Vec<PlanWarning>)> {
        let tree = scan(&self.source)?;
        Ok(plan(&self.registry, &tree, &self.default_kind))
    }

    /// Full run. `prior_plan` short-circuits planning with a graph loaded
    /// from an earlier `plan` invocation.
    ///
    /// The destination is cleaned first, so a failed run leaves partial
    /// output that the next run wipes; there is no partial-success contract.
    pub fn run(&self, prior_plan: Option<PackGraph>) -> PackrResult<RunReport> {
        if self.dest.exists() {
            fs::remove_dir_all(&self.dest)?;
        }
        fs::create_dir_all(&self.dest)?;

        let (mut graph, warnings) = match prior_plan {
            Some(graph) => (graph, Vec::new()),
            None => self.plan()?,
        };

        // execution is self-guarding, so every id can be started
        for id in graph.ids() {
            execute(&mut graph, &id, &self.source, &self.dest, &self.registry)?;
        }

        pruner::mark(&mut graph, &self.registry);
        let deleted = if self.keep_virtual {
            Vec::new()
        } else {
            pruner::delete_virtual(&graph, &self.dest)?
        };

        // inventory after pruning and before the manifest write, so the
        // manifest lists exactly the surviving outputs and never itself
        let mut manifest = AssetManifest::from_graph(&graph);
        manifest.files = manifest::inventory(&self.dest)?;
        manifest.write(&self.dest.join(&self.manifest_name))?;

        Ok(RunReport {
            warnings,
            deleted,
            manifest,
        })
    }
}
