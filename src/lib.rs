//! packr - asset pack compiler
//!
//! packr scans a source directory tree whose file and directory names encode
//! bundling intent (a trailing `#type` suffix picks a packer back end),
//! groups files into named packs that can include one another, delegates the
//! physical write to pluggable packers, and prunes pack artifacts that were
//! fully absorbed by an including pack.

pub mod config;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod models;
pub mod packers;
pub mod pipeline;
pub mod planner;
pub mod pruner;
pub mod scanner;

// Re-exports for convenience
pub use config::{Config, ConfigWarning};
pub use error::{PackrError, PackrResult};
pub use manifest::{plan_from_yaml, plan_to_yaml, AssetManifest, FileInfo, ManifestPack};
pub use models::{Pack, PackGraph, TreeNode, Virtuality};
pub use packers::{BundlePacker, Packer, PackerRegistry, RawPacker};
pub use pipeline::{PackPipeline, RunReport};
pub use planner::{plan, PlanWarning};
pub use scanner::scan;
