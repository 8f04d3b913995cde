//! Edit and append commands.

use anyhow::{bail, Result};
use console::style;
use fsguard_core::OperationResult;
use std::path::Path;

use crate::workspace::Workspace;

/// Replace one exact occurrence of `old` with `new`.
pub fn edit(root: &Path, path: &Path, old: &str, new: &str) -> Result<()> {
    let workspace = Workspace::open(root)?;
    report(workspace.fs.safe_edit(path, old, new))
}

/// Append `content` to `path`.
pub fn append(root: &Path, path: &Path, content: &str) -> Result<()> {
    let workspace = Workspace::open(root)?;
    report(workspace.fs.safe_append(path, content))
}

fn report(result: OperationResult) -> Result<()> {
    if result.success {
        println!("{} {}", style("✓").green(), result.machine_message);
        return Ok(());
    }

    eprintln!("{} {}", style("×").red(), result.user_message);
    bail!("{}", result.machine_message)
}
