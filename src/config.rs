//! Scan configuration.
//!
//! Read from an optional `.sbom.toml` in the scan root:
//! - `exclude`: repository directory names to skip
//! - `git_timeout_secs`: limit for each `git log` lookup, 0 for none
//! - `keep_going`: skip repositories whose manifest cannot be parsed

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = ".sbom.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Repository directory names to leave out of the scan.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Seconds to wait for `git log` before giving up on a repository.
    /// Zero waits indefinitely.
    #[serde(default = "default_git_timeout_secs")]
    pub git_timeout_secs: u64,

    /// Log and skip malformed manifests instead of failing the whole scan.
    #[serde(default)]
    pub keep_going: bool,
}

fn default_git_timeout_secs() -> u64 {
    30
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            git_timeout_secs: default_git_timeout_secs(),
            keep_going: false,
        }
    }
}

impl ScanConfig {
    /// Load config from `.sbom.toml` in the given directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn git_timeout(&self) -> Option<Duration> {
        (self.git_timeout_secs > 0).then(|| Duration::from_secs(self.git_timeout_secs))
    }
}
