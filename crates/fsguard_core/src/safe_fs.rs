//! Lock-protected file mutations.
//!
//! Every operation resolves its path through the [`PathResolver`] first,
//! then runs its whole read-modify-write under that path's lock from the
//! shared [`LockRegistry`]. Only callers going through the same registry
//! are coordinated; other writers of the same file are not.

use crate::error::{ErrorKind, FsGuardError, Result};
use crate::path::{CanonicalPath, PathResolver};
use crate::registry::LockRegistry;
use crate::result::OperationResult;
use std::fs::{self, OpenOptions, Permissions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Permission bits for files this crate creates (before umask).
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// File operations coordinated through a shared lock registry.
#[derive(Debug, Clone)]
pub struct SafeFs {
    registry: Arc<LockRegistry>,
    resolver: PathResolver,
}

impl SafeFs {
    /// Creates a `SafeFs` over `registry`, resolving paths with `resolver`.
    pub fn new(registry: Arc<LockRegistry>, resolver: PathResolver) -> Self {
        Self { registry, resolver }
    }

    /// The registry whose locks this instance takes.
    pub fn registry(&self) -> &Arc<LockRegistry> {
        &self.registry
    }

    /// The resolver applied to every requested path.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Replaces the single exact occurrence of `old_text` with `new_text`.
    ///
    /// # Errors
    ///
    /// - [`FsGuardError::NotFound`] if the file does not exist (no file is created)
    /// - [`FsGuardError::ContentNotFound`] if `old_text` does not occur
    /// - [`FsGuardError::AmbiguousMatch`] if it occurs more than once; the
    ///   file is left untouched
    /// - [`FsGuardError::OutsideSandbox`] / [`FsGuardError::Io`]
    pub fn edit(
        &self,
        path: impl AsRef<Path>,
        old_text: &str,
        new_text: &str,
    ) -> Result<CanonicalPath> {
        let requested = path.as_ref();
        let resolved = self.resolver.resolve(requested)?;

        self.registry.with_lock(&resolved, || -> Result<()> {
            let content = match fs::read_to_string(&resolved) {
                Ok(content) => content,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(FsGuardError::NotFound {
                        path: requested.to_path_buf(),
                    });
                }
                Err(e) => return Err(e.into()),
            };

            let updated = replace_unique(&content, old_text, new_text).map_err(|count| {
                if count == 0 {
                    FsGuardError::ContentNotFound {
                        path: requested.to_path_buf(),
                    }
                } else {
                    FsGuardError::AmbiguousMatch {
                        path: requested.to_path_buf(),
                        count,
                    }
                }
            })?;

            write_file(resolved.as_path(), updated.as_bytes())
        })?;

        debug!(path = %resolved, "edited file");
        Ok(resolved)
    }

    /// Appends `content` verbatim, creating the file if needed.
    ///
    /// No separator is inserted; an empty `content` still opens (and may
    /// create) the file.
    pub fn append(&self, path: impl AsRef<Path>, content: &str) -> Result<CanonicalPath> {
        let resolved = self.resolver.resolve(path)?;

        self.registry.with_lock(&resolved, || -> Result<()> {
            let mut file = new_file_options()
                .create(true)
                .append(true)
                .open(&resolved)?;
            file.write_all(content.as_bytes())?;
            Ok(())
        })?;

        debug!(path = %resolved, bytes = content.len(), "appended to file");
        Ok(resolved)
    }

    /// Replaces the whole file with `content`.
    pub fn write(&self, path: impl AsRef<Path>, content: &str) -> Result<CanonicalPath> {
        let resolved = self.resolver.resolve(path)?;
        self.registry
            .with_lock(&resolved, || write_file(resolved.as_path(), content.as_bytes()))?;
        debug!(path = %resolved, bytes = content.len(), "wrote file");
        Ok(resolved)
    }

    /// Reads the file under its lock. Returns `None` if it does not exist.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Option<String>> {
        let resolved = self.resolver.resolve(path)?;
        self.registry.with_lock(&resolved, || read_optional(resolved.as_path()))
    }

    /// Generic locked read-modify-write.
    ///
    /// `transform` receives the current content (`None` if the file does not
    /// exist) and returns the new content, which replaces the file
    /// atomically. An error from `transform` aborts without writing.
    pub fn update<F>(&self, path: impl AsRef<Path>, transform: F) -> Result<CanonicalPath>
    where
        F: FnOnce(Option<&str>) -> Result<String>,
    {
        let resolved = self.resolver.resolve(path)?;
        self.registry.with_lock(&resolved, || -> Result<()> {
            let current = read_optional(resolved.as_path())?;
            let updated = transform(current.as_deref())?;
            write_file(resolved.as_path(), updated.as_bytes())
        })?;
        debug!(path = %resolved, "updated file");
        Ok(resolved)
    }

    /// [`SafeFs::edit`] folded into an [`OperationResult`].
    ///
    /// Success is silent.
    pub fn safe_edit(
        &self,
        path: impl AsRef<Path>,
        old_text: &str,
        new_text: &str,
    ) -> OperationResult {
        let requested = path.as_ref();
        match self.edit(requested, old_text, new_text) {
            Ok(_) => OperationResult::silent(format!("File edited: {}", requested.display())),
            Err(e) => failure("edit", requested, e),
        }
    }

    /// [`SafeFs::append`] folded into an [`OperationResult`].
    ///
    /// Success is silent.
    pub fn safe_append(&self, path: impl AsRef<Path>, content: &str) -> OperationResult {
        let requested = path.as_ref();
        match self.append(requested, content) {
            Ok(_) => OperationResult::silent(format!("Appended to {}", requested.display())),
            Err(e) => failure("append", requested, e),
        }
    }
}

fn failure(operation: &str, path: &Path, error: FsGuardError) -> OperationResult {
    if error.kind() == ErrorKind::Io {
        warn!(operation, path = %path.display(), error = %error, "file operation failed");
    } else {
        debug!(operation, path = %path.display(), error = %error, "file operation rejected");
    }
    OperationResult::failure(&error)
}

/// Replaces the only occurrence of `old_text`.
///
/// On failure returns the number of occurrences found (0 or at least 2).
fn replace_unique(
    content: &str,
    old_text: &str,
    new_text: &str,
) -> std::result::Result<String, usize> {
    match content.matches(old_text).count() {
        1 => Ok(content.replacen(old_text, new_text, 1)),
        count => Err(count),
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn new_file_options() -> OpenOptions {
    #[allow(unused_mut)]
    let mut options = OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(NEW_FILE_MODE);
    }
    options
}

/// Replaces the contents of the file `path` refers to.
///
/// Symlinks are followed, so the link stays and its target changes. A file
/// with a single link is replaced atomically; one with several hard links is
/// rewritten in place so every link sees the new content.
fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(target) => target,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if fs::symlink_metadata(path).is_ok() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} is a symlink to a missing file", path.display()),
                )
                .into());
            }
            return atomic_write(path, data, None);
        }
        Err(e) => return Err(e.into()),
    };

    let metadata = fs::metadata(&target)?;
    if link_count(&metadata) > 1 {
        return rewrite_in_place(&target, data);
    }

    // rename only needs a writable directory; the file itself must be too.
    OpenOptions::new().write(true).open(&target)?;
    atomic_write(&target, data, Some(metadata.permissions()))
}

#[cfg(unix)]
fn link_count(metadata: &fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
fn link_count(_metadata: &fs::Metadata) -> u64 {
    1
}

fn rewrite_in_place(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}

/// Writes data atomically using a uniquely named sibling temp file + rename.
fn atomic_write(path: &Path, data: &[u8], permissions: Option<Permissions>) -> Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} does not name a file", path.display()),
        )
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp_path = parent.join(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        Uuid::new_v4().simple()
    ));

    if let Err(e) = write_temp(&tmp_path, data, permissions) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    // fsync parent directory (Unix)
    #[cfg(unix)]
    {
        if let Ok(dir_file) = fs::File::open(parent) {
            let _ = dir_file.sync_all();
        }
    }

    Ok(())
}

fn write_temp(tmp_path: &Path, data: &[u8], permissions: Option<Permissions>) -> io::Result<()> {
    let mut file = new_file_options()
        .write(true)
        .create_new(true)
        .open(tmp_path)?;
    file.write_all(data)?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    file.sync_all()
}
