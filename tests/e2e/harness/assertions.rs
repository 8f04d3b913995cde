use anyhow::{bail, Result};
use std::collections::HashMap;

use super::TestWorkspace;

/// Declarative assertions on a workspace file
#[derive(Debug, Clone)]
pub enum FileAssertion {
    /// File does not exist
    Missing,
    /// File content equals exactly
    Equals(String),
    /// File content contains the substring
    Contains(String),
    /// File content does not contain the substring
    NotContains(String),
    /// Exactly this many non-empty lines
    NonEmptyLines(usize),
    /// Every non-empty line is distinct
    DistinctLines,
    /// This exact line appears exactly once
    LineOnce(String),
}

impl FileAssertion {
    pub fn check(&self, workspace: &TestWorkspace, path: &str) -> Result<()> {
        if let Self::Missing = self {
            if workspace.file_exists(path) {
                bail!("expected {} to be missing", path);
            }
            return Ok(());
        }

        let content = workspace.read_file(path)?;
        match self {
            Self::Missing => unreachable!(),
            Self::Equals(expected) => {
                if &content != expected {
                    bail!("{}: expected {:?}, got {:?}", path, expected, content);
                }
            }
            Self::Contains(needle) => {
                if !content.contains(needle.as_str()) {
                    bail!("{}: expected to contain {:?}, got {:?}", path, needle, content);
                }
            }
            Self::NotContains(needle) => {
                if content.contains(needle.as_str()) {
                    bail!("{}: expected not to contain {:?}, got {:?}", path, needle, content);
                }
            }
            Self::NonEmptyLines(expected) => {
                let count = non_empty_lines(&content).count();
                if count != *expected {
                    bail!(
                        "{}: expected {} non-empty lines, got {}. File may be corrupted:\n{}",
                        path,
                        expected,
                        count,
                        content
                    );
                }
            }
            Self::DistinctLines => {
                let mut seen: HashMap<&str, usize> = HashMap::new();
                for line in non_empty_lines(&content) {
                    *seen.entry(line).or_default() += 1;
                }
                if let Some((line, count)) = seen.iter().find(|(_, &count)| count > 1) {
                    bail!("{}: line {:?} appears {} times", path, line, count);
                }
            }
            Self::LineOnce(line) => {
                let count = content.lines().filter(|l| l == line).count();
                if count != 1 {
                    bail!("{}: line {:?} appears {} times (expected 1)", path, line, count);
                }
            }
        }
        Ok(())
    }
}

fn non_empty_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().filter(|line| !line.trim().is_empty())
}
