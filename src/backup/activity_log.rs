//! Record of processed files.
//!
//! The backup run only talks to [`ActivityLog`]; [`FileActivityLog`] is the
//! implementation used by the binary and appends to `backup.log` inside the
//! backup root.

use crate::backup::result_error::result::Result;
use crate::backup::validate::validate_strftime;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use validator::ValidationErrors;

/// Name of the log file kept in the backup root.
pub static BACKUP_LOG_FILE_NAME: &str = "backup.log";

pub trait ActivityLog {
    /// Called once per file, after its copy has been fully written.
    fn record(&mut self, source: &Path) -> Result<()>;

    /// File the log writes to, if any. A backup never copies over it.
    fn location(&self) -> Option<&Path> {
        None
    }
}

#[derive(Debug)]
pub struct FileActivityLog {
    path: PathBuf,
    file: File,
    time_format: Arc<str>,
}

impl FileActivityLog {
    /// Opens `<dir>/backup.log` for appending, creating it when missing.
    pub fn open<P: AsRef<Path>, S: Into<Arc<str>>>(dir: P, time_format: S) -> Result<Self> {
        let time_format = time_format.into();
        if let Err(e) = validate_strftime(&time_format) {
            let mut errors = ValidationErrors::new();
            errors.add("time_format", e);
            return Err(errors.into());
        }

        let path = dir.as_ref().join(BACKUP_LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file,
            time_format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ActivityLog for FileActivityLog {
    fn record(&mut self, source: &Path) -> Result<()> {
        let mut line = Vec::new();
        writeln!(
            line,
            "{} Copied file: {}",
            Local::now().format(&self.time_format),
            source.display()
        )?;
        self.file.write_all(&line)?;
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}
