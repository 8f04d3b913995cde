//! Persistent agent memory.
//!
//! Lives under `<workspace>/<memory.dir>/`:
//! - `MEMORY.md` - long-term memory, rewritten as a whole
//! - `YYYYMM/YYYYMMDD.md` - daily notes, appended through the day
//!
//! All writes go through [`SafeFs`], so they serialize with any tool call
//! touching the same files.

use crate::config::MemoryConfig;
use crate::error::Result;
use crate::safe_fs::SafeFs;
use chrono::{Days, Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Separator placed between daily notes in [`MemoryStore::recent_daily_notes`].
pub const NOTE_SEPARATOR: &str = "\n\n---\n\n";

/// Long-term memory plus daily notes for one workspace.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    fs: SafeFs,
    dir: PathBuf,
}

impl MemoryStore {
    /// Opens the memory store, creating its directory if needed.
    ///
    /// The directory is checked against the sandbox before it is created.
    pub fn open(safe_fs: SafeFs, workspace: &Path, config: &MemoryConfig) -> Result<Self> {
        let dir = safe_fs
            .resolver()
            .resolve(workspace.join(&config.dir))?
            .into_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { fs: safe_fs, dir })
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the long-term memory file.
    pub fn long_term_path(&self) -> PathBuf {
        self.dir.join("MEMORY.md")
    }

    /// Path of the daily note for `date`.
    pub fn daily_path(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(date.format("%Y%m").to_string())
            .join(format!("{}.md", date.format("%Y%m%d")))
    }

    /// Reads long-term memory. Empty if nothing has been written yet.
    pub fn read_long_term(&self) -> Result<String> {
        Ok(self.fs.read(self.long_term_path())?.unwrap_or_default())
    }

    /// Replaces long-term memory.
    pub fn write_long_term(&self, content: &str) -> Result<()> {
        self.fs.write(self.long_term_path(), content)?;
        Ok(())
    }

    /// Reads the daily note for `date`. Empty if it does not exist.
    pub fn read_daily(&self, date: NaiveDate) -> Result<String> {
        Ok(self.fs.read(self.daily_path(date))?.unwrap_or_default())
    }

    /// Adds `content` to the daily note for `date`.
    ///
    /// A new note starts with a `# YYYY-MM-DD` header; later entries are
    /// separated from earlier ones by a newline.
    pub fn append_daily(&self, date: NaiveDate, content: &str) -> Result<PathBuf> {
        let path = self.fs.resolver().resolve(self.daily_path(date))?;
        let resolved = self.fs.update(&path, |existing| {
            if let Some(month_dir) = path.as_path().parent() {
                fs::create_dir_all(month_dir)?;
            }
            Ok(match existing {
                Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, content),
                _ => format!("# {}\n\n{}", date.format("%Y-%m-%d"), content),
            })
        })?;

        debug!(path = %resolved, "appended daily note");
        Ok(resolved.into_path_buf())
    }

    /// Reads today's note (local time).
    pub fn read_today(&self) -> Result<String> {
        self.read_daily(today())
    }

    /// Appends to today's note (local time).
    pub fn append_today(&self, content: &str) -> Result<PathBuf> {
        self.append_daily(today(), content)
    }

    /// Notes from `today` and the `days - 1` days before it, newest first,
    /// joined by [`NOTE_SEPARATOR`]. Missing days are skipped.
    pub fn recent_daily_notes(&self, today: NaiveDate, days: u32) -> Result<String> {
        let mut notes = Vec::new();
        for offset in 0..u64::from(days) {
            let Some(date) = today.checked_sub_days(Days::new(offset)) else {
                break;
            };
            if let Some(note) = self.fs.read(self.daily_path(date))? {
                notes.push(note);
            }
        }
        Ok(notes.join(NOTE_SEPARATOR))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
