//! Common test utilities for packr CLI tests.
//!
//! Provides `TestEnv`: an isolated project directory plus helpers to write
//! fixture trees and run the packr binary inside it.

// not every test binary uses every helper
#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

/// Result of running a packr CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Isolated test environment with a temp project directory.
pub struct TestEnv {
    root: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create temp project dir"),
        }
    }

    /// Get a path relative to the project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Write a file under the project root, creating parent directories
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture dirs");
        }
        std::fs::write(path, content).expect("write fixture file");
    }

    /// Run the packr binary from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(env!("CARGO_BIN_EXE_packr"))
            .args(args)
            .current_dir(self.root.path())
            .output()
            .expect("run packr binary");

        TestResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Parse the manifest written to `<dest>/manifest.json`
    pub fn manifest(&self, dest: &str) -> serde_json::Value {
        let path = self.path(dest).join("manifest.json");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("manifest not found at {}", path.display()));
        serde_json::from_str(&content).expect("manifest is valid JSON")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
