//! Append-only record of questions that nothing in the knowledge base matched.
//!
//! Each record is one line, `[%Y-%m-%d %H:%M:%S] <question>`. Nothing in this
//! process reads the log back.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};

use crate::error::Result;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub trait UnmatchedLog: Send + Sync {
    fn record(&self, text: &str, at: DateTime<Local>) -> Result<()>;
}

/// Formats a single record, newline included. Line breaks inside `text` are
/// flattened so a record never spans more than one line.
pub fn format_record(text: &str, at: DateTime<Local>) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("[{}] {}\n", at.format(TIMESTAMP_FORMAT), flat)
}

/// Appends records to a file at `path`.
///
/// The file is reopened in append mode for every record, so a rotated or
/// deleted log is recreated on the next write. The mutex serialises writers
/// within this process; `O_APPEND` keeps each line whole on disk.
#[derive(Debug)]
pub struct FileUnmatchedLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileUnmatchedLog {
    /// Never fails: an unwritable path only surfaces when a record is written.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Like [`FileUnmatchedLog::new`] but checks up front that the file can be
    /// created and appended to.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let log = Self::new(path);
        log.open_append()?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_append(&self) -> Result<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(OpenOptions::new().create(true).append(true).open(&self.path)?)
    }
}

impl UnmatchedLog for FileUnmatchedLog {
    fn record(&self, text: &str, at: DateTime<Local>) -> Result<()> {
        let line = format_record(text, at);
        // a poisoned lock only means another writer panicked; nothing is guarded but the write order
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = self.open_append()?;
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryUnmatchedLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryUnmatchedLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl UnmatchedLog for MemoryUnmatchedLog {
    fn record(&self, text: &str, at: DateTime<Local>) -> Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(format_record(text, at));
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullUnmatchedLog;

impl UnmatchedLog for NullUnmatchedLog {
    fn record(&self, _text: &str, _at: DateTime<Local>) -> Result<()> {
        Ok(())
    }
}
