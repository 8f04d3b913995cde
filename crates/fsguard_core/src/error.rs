//! Error types for fsguard_core operations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fsguard_core operations.
///
/// `Display` renders the machine-readable message handed back to the agent;
/// [`FsGuardError::user_message`] renders the explanation meant for a person.
#[derive(Error, Debug)]
pub enum FsGuardError {
    /// A required argument was missing or had the wrong type.
    #[error("{0} is required")]
    InvalidArgument(String),

    /// The file targeted by an edit does not exist.
    #[error("file not found: {}", path.display())]
    NotFound {
        /// Path as requested by the caller
        path: PathBuf,
    },

    /// The text to replace does not occur in the file.
    #[error("old_text not found in {}. Make sure it matches exactly", path.display())]
    ContentNotFound {
        /// Path as requested by the caller
        path: PathBuf,
    },

    /// The text to replace occurs more than once in the file.
    #[error("old_text appears {count} times in {}. Provide more context to make it unique", path.display())]
    AmbiguousMatch {
        /// Path as requested by the caller
        path: PathBuf,
        /// Number of occurrences found
        count: usize,
    },

    /// The resolved path escapes the sandbox root.
    #[error("access denied: {} is outside the workspace {}", path.display(), root.display())]
    OutsideSandbox {
        /// Resolved absolute path
        path: PathBuf,
        /// Sandbox root
        root: PathBuf,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    Config(String),
}

/// Discriminant of [`FsGuardError`], without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`FsGuardError::InvalidArgument`].
    InvalidArgument,
    /// See [`FsGuardError::NotFound`].
    NotFound,
    /// See [`FsGuardError::ContentNotFound`].
    ContentNotFound,
    /// See [`FsGuardError::AmbiguousMatch`].
    AmbiguousMatch,
    /// See [`FsGuardError::OutsideSandbox`].
    OutsideSandbox,
    /// See [`FsGuardError::Io`].
    Io,
    /// See [`FsGuardError::Config`].
    Config,
}

impl FsGuardError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::ContentNotFound { .. } => ErrorKind::ContentNotFound,
            Self::AmbiguousMatch { .. } => ErrorKind::AmbiguousMatch,
            Self::OutsideSandbox { .. } => ErrorKind::OutsideSandbox,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns a human-readable explanation of the failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgument(field) => {
                format!("The request is missing the '{}' argument.", field)
            }
            Self::NotFound { path } => {
                format!("Cannot edit {}: the file does not exist.", path.display())
            }
            Self::ContentNotFound { path } => format!(
                "The text to replace was not found in {}. Copy it exactly, including whitespace.",
                path.display()
            ),
            Self::AmbiguousMatch { path, count } => format!(
                "The text to replace appears {} times in {}. Include more surrounding lines so it matches exactly once.",
                count,
                path.display()
            ),
            Self::OutsideSandbox { path, .. } => format!(
                "{} is outside the allowed workspace and cannot be modified.",
                path.display()
            ),
            Self::Io(e) => format!("The file could not be read or written: {}.", e),
            Self::Config(reason) => format!("The configuration is invalid: {}.", reason),
        }
    }
}

/// Convenience Result type for fsguard_core operations.
pub type Result<T> = std::result::Result<T, FsGuardError>;
