//! Workspace wiring shared by all commands.

use anyhow::{Context, Result};
use fsguard_core::{Config, LockRegistry, MemoryStore, SafeFs};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded workspace: configuration plus the file operations built from it.
pub struct Workspace {
    pub root: PathBuf,
    pub config: Config,
    pub fs: SafeFs,
}

impl Workspace {
    /// Loads `fsguard.toml` (or defaults) and builds the lock registry.
    pub fn open(root: &Path) -> Result<Self> {
        let config = Config::load(root)
            .with_context(|| format!("Failed to load config from {}", root.display()))?;
        let registry = Arc::new(LockRegistry::new());
        let fs = SafeFs::new(registry, config.resolver(root));
        Ok(Self {
            root: root.to_path_buf(),
            config,
            fs,
        })
    }

    /// Opens the memory store configured for this workspace.
    pub fn memory(&self) -> Result<MemoryStore> {
        MemoryStore::open(self.fs.clone(), &self.root, &self.config.memory)
            .context("Failed to open memory store")
    }
}
