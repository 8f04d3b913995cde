use crate::harness::{FileAssertion, TestWorkspace};
use fsguard_core::ErrorKind;
use std::fs;

#[test]
fn test_paths_outside_workspace_are_rejected_before_locking() {
    let ws = TestWorkspace::empty().unwrap();
    let other = tempfile::TempDir::new().unwrap();
    let outside = other.path().join("test.txt");
    fs::write(&outside, "content").unwrap();

    let fs_ops = ws.safe_fs();
    let edit = fs_ops.safe_edit(&outside, "content", "new");
    let append = fs_ops.safe_append("../escape.txt", "x");

    assert_eq!(edit.error_kind, Some(ErrorKind::OutsideSandbox));
    assert!(edit.machine_message.contains("outside"));
    assert_eq!(append.error_kind, Some(ErrorKind::OutsideSandbox));
    assert_eq!(fs::read_to_string(&outside).unwrap(), "content");
    assert!(ws.registry().is_empty());
}

#[test]
fn test_relative_paths_land_in_workspace() {
    let ws = TestWorkspace::empty().unwrap();
    fs::create_dir_all(ws.file("notes")).unwrap();

    let result = ws.safe_fs().safe_append("notes/./today.md", "- item\n");

    assert!(result.success);
    ws.assert_file("notes/today.md", &[FileAssertion::Equals("- item\n".into())])
        .unwrap();
}
