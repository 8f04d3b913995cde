//! fsguard Core Library
//!
//! Coordinated file mutation for agent tool calls, providing:
//! - Per-path in-process locking with guaranteed release
//! - Exact, unique text replacement (`edit_file`)
//! - Verbatim append (`append_file`)
//! - Sandbox-confined path resolution
//! - A persistent memory store built on the same locks
//!
//! # Quick Start
//!
//! ```
//! use fsguard_core::{LockRegistry, PathResolver, SafeFs};
//! use std::sync::Arc;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let registry = Arc::new(LockRegistry::new());
//! let fs = SafeFs::new(registry, PathResolver::sandboxed(tmp.path(), true));
//!
//! std::fs::write(tmp.path().join("notes.md"), "status: open\n").unwrap();
//!
//! let result = fs.safe_edit("notes.md", "open", "done");
//! assert!(result.success);
//! assert!(result.silent);
//!
//! let result = fs.safe_append("notes.md", "checked\n");
//! assert!(result.success);
//! ```
//!
//! # Features
//!
//! ## Ambiguous edits are refused
//!
//! ```
//! use fsguard_core::{ErrorKind, LockRegistry, PathResolver, SafeFs};
//! use std::sync::Arc;
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let fs = SafeFs::new(Arc::new(LockRegistry::new()), PathResolver::sandboxed(tmp.path(), true));
//! std::fs::write(tmp.path().join("a.txt"), "test test test").unwrap();
//!
//! let result = fs.safe_edit("a.txt", "test", "done");
//! assert_eq!(result.error_kind, Some(ErrorKind::AmbiguousMatch));
//! assert_eq!(std::fs::read_to_string(tmp.path().join("a.txt")).unwrap(), "test test test");
//! ```
//!
//! ## Scoped locking
//!
//! ```
//! use fsguard_core::LockRegistry;
//!
//! let registry = LockRegistry::new();
//! let len = registry.with_lock("/tmp/shared.txt", || {
//!     // Nobody else using this registry is inside a `with_lock` for the
//!     // same path right now.
//!     "payload".len()
//! });
//! assert_eq!(len, 7);
//! ```

mod config;
mod error;
mod memory;
mod path;
mod registry;
mod result;
mod safe_fs;
mod tools;

pub use config::{Config, MemoryConfig, SandboxConfig, CONFIG_FILE};
pub use error::{ErrorKind, FsGuardError, Result};
pub use memory::{MemoryStore, NOTE_SEPARATOR};
pub use path::{clean, CanonicalPath, PathResolver};
pub use registry::{LockRegistry, ScopedLock};
pub use result::OperationResult;
pub use safe_fs::SafeFs;
pub use tools::{AppendFileTool, EditFileTool, FileTool};
