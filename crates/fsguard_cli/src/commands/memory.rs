//! Memory commands: daily notes and the memory overview.

use anyhow::Result;
use chrono::Local;
use console::style;
use std::path::Path;

use crate::workspace::Workspace;

/// Add a note to today's daily file.
pub fn note(root: &Path, text: &str) -> Result<()> {
    let workspace = Workspace::open(root)?;
    let memory = workspace.memory()?;

    let path = memory.append_today(text)?;

    println!("Added note to {}", path.display());
    Ok(())
}

/// Print long-term memory and recent daily notes.
pub fn show(root: &Path, days: Option<u32>) -> Result<()> {
    let workspace = Workspace::open(root)?;
    let memory = workspace.memory()?;
    let days = days.unwrap_or(workspace.config.memory.recent_days);

    let long_term = memory.read_long_term()?;
    let recent = memory.recent_daily_notes(Local::now().date_naive(), days)?;

    println!("{}", style("Long-term Memory:").bold());
    if long_term.is_empty() {
        println!("  {}", style("(empty)").dim());
    } else {
        println!("{}", long_term);
    }

    println!();
    println!(
        "{}",
        style(format!("Recent Daily Notes ({} days):", days)).bold()
    );
    if recent.is_empty() {
        println!("  {}", style("(none)").dim());
    } else {
        println!("{}", recent);
    }

    Ok(())
}
