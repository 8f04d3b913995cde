//! Per-path lock registry.
//!
//! One exclusive lock per [`CanonicalPath`], created on first use. The map
//! itself sits behind a coarse mutex held only for lookup-or-insert; file
//! I/O runs under the per-path lock alone, so unrelated files never
//! serialize against each other.
//!
//! Locks are strictly in-process. Nothing here coordinates with other
//! processes touching the same files.

use crate::path::CanonicalPath;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

type PathLock = Arc<Mutex<()>>;

/// Owns the lock for every path touched through it.
///
/// Construct one at the composition root and share it (usually behind an
/// `Arc`) with every caller that mutates files. Separate registries do not
/// see each other's locks.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<CanonicalPath, PathLock>>,
}

impl LockRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the lock for `path` is held and returns a guard.
    ///
    /// Never fails and never times out. The lock is released when the
    /// returned [`ScopedLock`] is dropped, including during unwinding.
    pub fn acquire(&self, path: impl AsRef<Path>) -> ScopedLock {
        let key = CanonicalPath::new(path);
        let guard = self.lock_for(&key).lock_arc();
        trace!(path = %key, "acquired path lock");
        ScopedLock { path: key, _guard: guard }
    }

    /// Takes the lock for `path` only if it is free right now.
    pub fn try_acquire(&self, path: impl AsRef<Path>) -> Option<ScopedLock> {
        let key = CanonicalPath::new(path);
        let guard = self.lock_for(&key).try_lock_arc()?;
        trace!(path = %key, "acquired path lock without waiting");
        Some(ScopedLock { path: key, _guard: guard })
    }

    /// Runs `operation` while holding the lock for `path`.
    ///
    /// The lock is released however `operation` exits: normal return,
    /// error value, or panic.
    pub fn with_lock<R>(&self, path: impl AsRef<Path>, operation: impl FnOnce() -> R) -> R {
        let _lock = self.acquire(path);
        operation()
    }

    /// Number of paths that currently have a lock registered.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    /// Returns true if no lock has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }

    /// Drops registered locks that nobody holds or waits on.
    ///
    /// The registry never evicts on its own; long-running callers that
    /// touch many distinct paths may call this periodically. Returns the
    /// number of entries removed.
    pub fn prune_idle(&self) -> usize {
        let mut locks = self.locks.lock();
        let before = locks.len();
        // Holders and waiters each keep a clone, and clones are only handed
        // out under this mutex.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        let removed = before - locks.len();
        if removed > 0 {
            debug!(removed, remaining = locks.len(), "pruned idle path locks");
        }
        removed
    }

    fn lock_for(&self, key: &CanonicalPath) -> PathLock {
        let mut locks = self.locks.lock();
        Arc::clone(
            locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }
}

/// Exclusive hold on one path's lock. Released on drop.
#[must_use = "the path lock is released as soon as the guard is dropped"]
pub struct ScopedLock {
    path: CanonicalPath,
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl ScopedLock {
    /// The canonical path this guard protects.
    pub fn path(&self) -> &CanonicalPath {
        &self.path
    }

    /// Releases the lock now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ScopedLock {
    fn drop(&mut self) {
        trace!(path = %self.path, "released path lock");
    }
}

impl std::fmt::Debug for ScopedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedLock").field("path", &self.path).finish()
    }
}
