//! Configuration module for packr
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority, applied by the binary)
//! 2. Environment variables (PACKR_*)
//! 3. Project config (`packr.toml` next to the source tree)
//! 4. Built-in defaults (lowest priority)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PackrError, PackrResult};

/// Config file name looked up in the project root
pub const CONFIG_FILE: &str = "packr.toml";

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Source root to scan
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Destination directory for pack outputs
    #[serde(default = "default_dest")]
    pub dest: PathBuf,

    /// Packer type a bare file falls into when no ancestor claimed it
    #[serde(default = "default_kind", rename = "default_type")]
    pub default_kind: String,

    /// Manifest file name written inside the destination
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_source() -> PathBuf {
    PathBuf::from("assets")
}

fn default_dest() -> PathBuf {
    PathBuf::from("build/assets")
}

fn default_kind() -> String {
    "raw".to_string()
}

fn default_manifest() -> String {
    "manifest.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: default_source(),
            dest: default_dest(),
            default_kind: default_kind(),
            manifest: default_manifest(),
        }
    }
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The unknown key
    pub key: String,
    /// The file where the warning occurred
    pub file: PathBuf,
    /// The line number (1-indexed) if available
    pub line: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> PackrResult<Self> {
        let (config, _warnings) = Self::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (unknown keys).
    pub fn load_with_warnings(path: &Path) -> PackrResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let config: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown_paths.push(path.to_string());
        })
        .map_err(|e| PackrError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|path_str| {
                let key = path_str
                    .split('.')
                    .next_back()
                    .unwrap_or(path_str.as_str())
                    .to_string();
                ConfigWarning {
                    line: find_line_number(&content, &key),
                    key,
                    file: path.to_path_buf(),
                }
            })
            .collect();

        Ok((config, warnings))
    }

    /// Load from the project config if present, else defaults; env
    /// overrides apply in both cases.
    pub fn load_or_default(project_root: &Path) -> Self {
        let project_config = project_root.join(CONFIG_FILE);
        if project_config.exists() {
            if let Ok(config) = Self::load(&project_config) {
                return config.with_env_overrides();
            }
        }
        Self::default().with_env_overrides()
    }

    /// Apply environment variable overrides (PACKR_* prefix)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(source) = std::env::var("PACKR_SOURCE") {
            self.source = PathBuf::from(source);
        }
        if let Ok(dest) = std::env::var("PACKR_DEST") {
            self.dest = PathBuf::from(dest);
        }
        if let Ok(kind) = std::env::var("PACKR_DEFAULT_TYPE") {
            self.default_kind = kind;
        }
        self
    }
}

fn find_line_number(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.trim_start().starts_with(key))
        .map(|idx| idx + 1)
}
