use anyhow::{Context, Result};
use fsguard_core::{
    AppendFileTool, EditFileTool, LockRegistry, MemoryConfig, MemoryStore, PathResolver, SafeFs,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Isolated sandbox directory plus the registry every helper shares.
pub struct TestWorkspace {
    dir: TempDir,
    registry: Arc<LockRegistry>,
}

impl TestWorkspace {
    /// Create an empty workspace
    pub fn empty() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp directory")?;
        Ok(Self {
            dir,
            registry: Arc::new(LockRegistry::new()),
        })
    }

    /// Create workspace with initial files
    pub fn with_files(files: &[(&str, &str)]) -> Result<Self> {
        let workspace = Self::empty()?;
        for (path, content) in files {
            workspace.write_file(path, content)?;
        }
        Ok(workspace)
    }

    /// Get workspace path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a workspace-relative file
    pub fn file(&self, path: &str) -> PathBuf {
        self.path().join(path)
    }

    /// The registry shared by every `SafeFs` this workspace hands out
    pub fn registry(&self) -> &Arc<LockRegistry> {
        &self.registry
    }

    /// File operations confined to the workspace
    pub fn safe_fs(&self) -> SafeFs {
        SafeFs::new(
            Arc::clone(&self.registry),
            PathResolver::sandboxed(self.path(), true),
        )
    }

    /// Agent tools confined to the workspace
    pub fn tools(&self) -> (EditFileTool, AppendFileTool) {
        let fs = self.safe_fs();
        (EditFileTool::new(fs.clone()), AppendFileTool::new(fs))
    }

    /// Memory store in `<workspace>/memory`
    pub fn memory(&self) -> Result<MemoryStore> {
        Ok(MemoryStore::open(
            self.safe_fs(),
            self.path(),
            &MemoryConfig::default(),
        )?)
    }

    /// Write file to workspace, bypassing locks
    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let full_path = self.file(path);

        // Create parent directories
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directories for {}", path))?;
        }

        fs::write(&full_path, content).with_context(|| format!("Failed to write file: {}", path))?;

        Ok(())
    }

    /// Read file from workspace
    pub fn read_file(&self, path: &str) -> Result<String> {
        fs::read_to_string(self.file(path)).with_context(|| format!("Failed to read file: {}", path))
    }

    /// Check if file exists
    pub fn file_exists(&self, path: &str) -> bool {
        self.file(path).exists()
    }

    /// Check a list of assertions against one file
    pub fn assert_file(&self, path: &str, assertions: &[super::FileAssertion]) -> Result<()> {
        for assertion in assertions {
            assertion.check(self, path)?;
        }
        Ok(())
    }
}
