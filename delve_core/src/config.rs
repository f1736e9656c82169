//! # Engine Configuration
//!
//! Settings for the sandbox boundary layer and the native process runner,
//! loaded from a TOML file. Every field has a default so an empty file (or no
//! file at all) yields a working configuration.
//!
//! ```toml
//! sandbox_root = "world"
//! protected_dir = "inventory"
//! command_timeout_seconds = 10
//! confine_reads = true
//! log_level = "info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{DEFAULT_LOG_LEVEL, DEFAULT_SANDBOX_ROOT};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EngineConfig {
    /// Directory every command is confined to. Created at startup if missing.
    pub sandbox_root: PathBuf,
    /// Subtree of the root that can never be deleted or moved, e.g. `inventory`.
    /// Relative paths are resolved against `sandbox_root`.
    pub protected_dir: Option<PathBuf>,
    /// Kill native processes that run longer than this.
    pub command_timeout_seconds: Option<u64>,
    /// Also confine `ls`, `cat`, and `tree` operands to the root.
    pub confine_reads: bool,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sandbox_root: PathBuf::from(DEFAULT_SANDBOX_ROOT),
            protected_dir: None,
            command_timeout_seconds: None,
            confine_reads: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse engine configuration")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded engine config from {:?}: {:?}", path, config);
        Ok(config)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_seconds.map(Duration::from_secs)
    }

    /// The protected directory, with a relative `protected_dir` resolved
    /// against `root` (normally the canonical sandbox root).
    pub fn protected_path(&self, root: &Path) -> Option<PathBuf> {
        self.protected_dir.as_ref().map(|dir| {
            if dir.is_absolute() {
                dir.clone()
            } else {
                root.join(dir)
            }
        })
    }
}
