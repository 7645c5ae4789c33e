//! Error types for packr
//!
//! Uses `thiserror` for library errors; the CLI wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for packr operations
pub type PackrResult<T> = Result<T, PackrError>;

/// Main error type for packr operations
#[derive(Error, Debug)]
pub enum PackrError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration file
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Source root does not exist or is not a directory
    #[error("source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// A pack id was referenced that is not present in the graph
    #[error("pack not found in graph: {id}")]
    PackNotFound { id: String },

    /// A pack's include list references a pack absent from the graph
    #[error("pack '{pack}' includes '{include}', which is not in the pack graph")]
    MissingInclude { pack: String, include: String },

    /// Execution reached a pack whose packer type has no registered back end
    #[error("no packer registered for type '{kind}' required by pack '{pack}'")]
    UnknownPacker { kind: String, pack: String },
}
