//! Path canonicalization and sandbox enforcement.
//!
//! Every file operation passes through here before any lock is taken:
//! the requested path is made absolute, cleaned lexically, and (when a
//! sandbox is enforced) checked against the workspace root.

use crate::error::{FsGuardError, Result};
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Normalized key identifying a filesystem resource.
///
/// Two spellings of the same file (relative and absolute, with or without
/// `.`/`..` segments) produce the same key for a fixed working directory.
/// Symlinks are not followed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPath(PathBuf);

impl CanonicalPath {
    /// Canonicalizes `path` against the process working directory.
    ///
    /// If the working directory cannot be determined, falls back to the
    /// cleaned (still relative) path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.is_absolute() {
            return Self(clean(path));
        }
        match std::env::current_dir() {
            Ok(cwd) => Self(clean(&cwd.join(path))),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "working directory unavailable, using relative key");
                Self(clean(path))
            }
        }
    }

    /// Canonicalizes `path` against an explicit base directory.
    ///
    /// Absolute paths ignore `base`.
    pub fn resolve_from(path: impl AsRef<Path>, base: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.is_absolute() {
            Self(clean(path))
        } else {
            Self(clean(&base.as_ref().join(path)))
        }
    }

    /// Returns the key as a path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Consumes the key, returning the underlying path.
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for CanonicalPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Lexically normalizes a path: drops `.`, folds `name/..`, and keeps
/// `..` at the root pinned to the root.
///
/// An empty result becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        PathBuf::from(".")
    } else {
        out.iter().collect()
    }
}

/// Resolves requested paths to absolute keys, optionally confined to a root.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    root: Option<PathBuf>,
    restrict: bool,
}

impl PathResolver {
    /// Resolver with no root: paths resolve against the working directory
    /// and are never rejected.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Resolver rooted at `root`. Relative paths resolve against the root;
    /// with `restrict` set, anything outside the root is rejected.
    pub fn sandboxed(root: impl AsRef<Path>, restrict: bool) -> Self {
        Self {
            root: Some(CanonicalPath::new(root).into_path_buf()),
            restrict,
        }
    }

    /// Returns the sandbox root, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Returns true if paths outside the root are rejected.
    pub fn is_restricted(&self) -> bool {
        self.restrict && self.root.is_some()
    }

    /// Resolves `requested` to a canonical absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`FsGuardError::OutsideSandbox`] if the resolver is restricted
    /// and the path (lexically, or through a symlinked ancestor) leaves the root.
    pub fn resolve(&self, requested: impl AsRef<Path>) -> Result<CanonicalPath> {
        let requested = requested.as_ref();
        let root = match &self.root {
            Some(root) => root,
            None => return Ok(CanonicalPath::new(requested)),
        };

        let resolved = CanonicalPath::resolve_from(requested, root);
        if self.restrict
            && (!resolved.as_path().starts_with(root) || !resolves_inside(resolved.as_path(), root))
        {
            debug!(path = %resolved, root = %root.display(), "rejected path outside sandbox");
            return Err(FsGuardError::OutsideSandbox {
                path: resolved.into_path_buf(),
                root: root.clone(),
            });
        }

        Ok(resolved)
    }
}

/// Follows symlinks on the nearest existing ancestor of `path` and checks
/// the result is still under the real location of `root`.
///
/// A root that does not exist has nothing to follow and passes.
fn resolves_inside(path: &Path, root: &Path) -> bool {
    let real_root = match fs::canonicalize(root) {
        Ok(real) => real,
        Err(_) => return true,
    };

    let mut ancestor = path;
    loop {
        if let Ok(real) = fs::canonicalize(ancestor) {
            return real.starts_with(&real_root);
        }
        match ancestor.parent() {
            Some(parent) => ancestor = parent,
            None => return true,
        }
    }
}
