//! Concurrent append check.

use anyhow::{bail, Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::Path;
use std::thread;

use crate::workspace::Workspace;

/// Spawn `writers` threads, each appending `appends` unique lines to `path`
/// through one registry, then check every line landed exactly once.
pub fn run(root: &Path, path: &Path, writers: usize, appends: usize) -> Result<()> {
    let workspace = Workspace::open(root)?;
    let tag = format!("stress-{}", std::process::id());
    let expected = expected_lines(writers, appends)?;
    let total = expected as u64;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} appends")
            .context("Invalid progress template")?
            .progress_chars("=> "),
    );

    let handles: Vec<_> = (0..writers)
        .map(|writer| {
            let fs = workspace.fs.clone();
            let path = path.to_path_buf();
            let tag = tag.clone();
            let pb = pb.clone();
            thread::spawn(move || {
                let mut failures = 0usize;
                for n in 0..appends {
                    let line = format!("{} writer {} line {}\n", tag, writer, n);
                    if fs.safe_append(&path, &line).is_error() {
                        failures += 1;
                    }
                    pb.inc(1);
                }
                failures
            })
        })
        .collect();

    let mut failures = 0;
    for handle in handles {
        failures += handle
            .join()
            .map_err(|_| anyhow::anyhow!("writer thread panicked"))?;
    }
    pb.finish_and_clear();

    let content = workspace
        .fs
        .read(path)?
        .with_context(|| format!("{} was not created", path.display()))?;

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for line in content.lines().filter(|l| l.starts_with(&tag)) {
        *seen.entry(line).or_default() += 1;
    }
    let duplicated = seen.values().filter(|&&count| count > 1).count();
    let missing = expected.saturating_sub(seen.len());

    println!("{}", style("Stress Report:").bold());
    println!("  Appends issued:     {}", style(total).cyan());
    println!("  Failed appends:     {}", style(failures).cyan());
    println!("  Distinct lines:     {}", style(seen.len()).cyan());
    println!("  Duplicated lines:   {}", style(duplicated).cyan());
    println!("  Missing lines:      {}", style(missing).cyan());

    if failures > 0 || duplicated > 0 || missing > 0 {
        println!("{} Concurrent appends were lost or corrupted", style("×").red());
        bail!("stress check failed");
    }

    println!("{} Every append landed exactly once", style("✓").green());
    Ok(())
}

/// Total lines a run should produce.
fn expected_lines(writers: usize, appends: usize) -> Result<usize> {
    writers
        .checked_mul(appends)
        .with_context(|| format!("{} writers x {} appends is too many", writers, appends))
}
