//! Initialize an fsguard workspace.

use anyhow::{Context, Result};
use console::style;
use fsguard_core::{Config, CONFIG_FILE};
use std::path::Path;

use crate::workspace::Workspace;

/// Write the default configuration (unless present) and create the memory directory.
pub fn run(root: &Path) -> Result<()> {
    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() {
        println!(
            "{} {} already exists, leaving it unchanged",
            style("→").cyan(),
            config_path.display()
        );
    } else {
        Config::default()
            .save(root)
            .context("Failed to write configuration")?;
        println!("{} Wrote {}", style("✓").green(), config_path.display());
    }

    let workspace = Workspace::open(root)?;
    workspace.memory()?;

    println!();
    println!("Workspace layout:");
    println!("  {:<22} - Configuration", CONFIG_FILE);
    println!("  {:<22} - Long-term memory", format!("{}/MEMORY.md", workspace.config.memory.dir));
    println!("  {:<22} - Daily notes", format!("{}/YYYYMM/", workspace.config.memory.dir));
    println!();
    println!(
        "Sandbox: {} ({})",
        workspace.fs.resolver().root().unwrap_or(root).display(),
        if workspace.config.sandbox.restrict {
            "restricted"
        } else {
            "unrestricted"
        }
    );

    Ok(())
}
