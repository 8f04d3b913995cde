use fsguard_core::{CanonicalPath, LockRegistry};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

/// Holds `path` on another thread and runs `probe` while it is held.
fn while_held<R>(registry: &Arc<LockRegistry>, path: &Path, probe: impl FnOnce() -> R) -> R {
    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let holder = {
        let registry = Arc::clone(registry);
        let path = path.to_path_buf();
        thread::spawn(move || {
            let _lock = registry.acquire(&path);
            held_tx.send(()).unwrap();
            release_rx.recv().unwrap();
        })
    };

    held_rx.recv().unwrap();
    let result = probe();
    release_tx.send(()).unwrap();
    holder.join().unwrap();
    result
}

#[test]
fn test_relative_and_absolute_spellings_serialize() {
    // Relative spelling needs a directory under the working directory. It is
    // removed on drop, including on a failed assertion; an interrupted run
    // (Ctrl-C) can leave `fsguard-e2e-*` directories behind in `tests/`.
    let dir = tempfile::Builder::new()
        .prefix("fsguard-e2e-")
        .tempdir_in(".")
        .unwrap();
    let relative = dir.path().join("a").join("b.txt");
    let absolute = std::env::current_dir().unwrap().join(&relative);
    assert!(relative.is_relative());

    let registry = Arc::new(LockRegistry::new());
    let blocked = while_held(&registry, &relative, || {
        registry.try_acquire(&absolute).is_none()
    });

    assert!(blocked, "absolute spelling did not contend with relative one");
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_dot_segments_serialize() {
    let tmp = tempfile::TempDir::new().unwrap();
    let plain = tmp.path().join("notes.md");
    let dotted = tmp.path().join("sub").join("..").join(".").join("notes.md");

    let registry = Arc::new(LockRegistry::new());
    let blocked = while_held(&registry, &plain, || registry.try_acquire(&dotted).is_none());

    assert!(blocked);
}

#[test]
fn test_relative_key_follows_working_directory() {
    // Known edge case: the same relative spelling resolved under two working
    // directories yields two keys, so the calls do not serialize.
    let first_cwd = tempfile::TempDir::new().unwrap();
    let second_cwd = tempfile::TempDir::new().unwrap();

    let first = CanonicalPath::resolve_from("memory/MEMORY.md", first_cwd.path());
    let second = CanonicalPath::resolve_from("memory/MEMORY.md", second_cwd.path());
    assert_ne!(first, second);

    let registry = Arc::new(LockRegistry::new());
    let blocked = while_held(&registry, first.as_path(), || {
        registry.try_acquire(&second).is_none()
    });
    assert!(!blocked);
}
