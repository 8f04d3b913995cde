use crate::harness::{run_concurrently, timed, TestWorkspace};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const SLOW_OP: Duration = Duration::from_millis(200);

#[test]
fn test_distinct_paths_do_not_block_each_other() {
    let ws = TestWorkspace::empty().unwrap();
    let registry = ws.registry().clone();
    let first = ws.file("file1.txt");
    let second = ws.file("file2.txt");

    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let holder = {
        let registry = registry.clone();
        thread::spawn(move || {
            registry.with_lock(&first, || {
                held_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            });
        })
    };

    held_rx.recv().unwrap();
    // While file1 is held, file2 is immediately available.
    let lock = registry.try_acquire(&second);
    assert!(lock.is_some());
    drop(lock);
    assert!(ws.safe_fs().safe_append(&second, "file2").success);

    release_tx.send(()).unwrap();
    holder.join().unwrap();
}

#[test]
fn test_distinct_paths_run_in_parallel() {
    let ws = TestWorkspace::empty().unwrap();
    let registry = ws.registry().clone();
    let paths = [ws.file("file1.txt"), ws.file("file2.txt")];

    let elapsed = timed(|| {
        run_concurrently(2, move |i| {
            registry.with_lock(&paths[i], || thread::sleep(SLOW_OP));
        });
    });

    // Serialized would take at least 2 * SLOW_OP.
    assert!(
        elapsed < SLOW_OP * 2 - Duration::from_millis(20),
        "distinct files appear serialized (took {:?})",
        elapsed
    );
}

#[test]
fn test_same_path_is_serialized() {
    let ws = TestWorkspace::empty().unwrap();
    let registry = ws.registry().clone();
    let path = ws.file("test.txt");

    let elapsed = timed(|| {
        run_concurrently(2, move |_| {
            registry.with_lock(&path, || thread::sleep(SLOW_OP));
        });
    });

    assert!(
        elapsed >= SLOW_OP * 2,
        "same file bodies overlapped (took {:?})",
        elapsed
    );
}
