//! Configuration for an fsguard workspace.

use crate::error::{FsGuardError, Result};
use crate::path::PathResolver;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside a workspace.
pub const CONFIG_FILE: &str = "fsguard.toml";

/// Top-level workspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Path confinement.
    #[serde(default)]
    pub sandbox: SandboxConfig,

    /// Memory store layout.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Load configuration from `<workspace>/fsguard.toml`, or defaults if absent.
    pub fn load(workspace: &Path) -> Result<Self> {
        let path = workspace.join(CONFIG_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| FsGuardError::Config(format!("failed to read config: {}", e)))?;
            toml::from_str(&content)
                .map_err(|e| FsGuardError::Config(format!("failed to parse config: {}", e)))
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to `<workspace>/fsguard.toml`.
    pub fn save(&self, workspace: &Path) -> Result<()> {
        let path = workspace.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .map_err(|e| FsGuardError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&path, content)
            .map_err(|e| FsGuardError::Config(format!("failed to write config: {}", e)))?;
        Ok(())
    }

    /// Builds the path resolver for a workspace.
    ///
    /// A relative `sandbox.root` is taken relative to the workspace.
    pub fn resolver(&self, workspace: &Path) -> PathResolver {
        let root = match &self.sandbox.root {
            Some(root) => workspace.join(root),
            None => workspace.to_path_buf(),
        };
        PathResolver::sandboxed(root, self.sandbox.restrict)
    }
}

/// Path confinement settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SandboxConfig {
    /// Reject paths outside the root (default: true).
    pub restrict: bool,

    /// Sandbox root. Defaults to the workspace directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            restrict: true,
            root: None,
        }
    }
}

/// Memory store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Directory holding MEMORY.md and daily notes, relative to the workspace
    /// (default: "memory").
    pub dir: String,

    /// Days of daily notes included by `recent_daily_notes` (default: 3).
    pub recent_days: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            dir: "memory".to_string(),
            recent_days: 3,
        }
    }
}
