//! Re-export of backup contents into a separate directory.

use crate::backup::activity_log::BACKUP_LOG_FILE_NAME;
use crate::backup::encrypt::EncryptorConfig;
use crate::backup::policy::describe_name_list;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::settings::Settings;
use crate::backup::transform::stream_file;
use bon::Builder;
use getset::{CopyGetters, Getters};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name given to the copy of `backup.log` in the share directory.
pub static SHARE_LOG_FILE_NAME: &str = "backup_share.log";

#[derive(Clone, Debug, Builder, PartialEq, Eq, Getters, CopyGetters)]
pub struct ShareRequest {
    #[builder(into)]
    #[getset(get = "pub")]
    dir: PathBuf,
    /// Base names of backed up files to copy over.
    #[builder(default, into)]
    #[getset(get = "pub")]
    files: BTreeSet<String>,
    /// Copy the backup's activity log.
    #[builder(default)]
    #[getset(get_copy = "pub")]
    prev_versions: bool,
}

impl ShareRequest {
    /// Copies the requested items out of `settings.root_dir()` and returns
    /// how many files were written.
    pub fn run(&self, settings: &Settings) -> Result<usize> {
        if !self.prev_versions && self.files.is_empty() {
            info!("Nothing to share");
            return Ok(0);
        }

        // Checked before the share directory is touched.
        for name in &self.files {
            check_plain_file_name(name)?;
        }

        std::fs::create_dir_all(&self.dir)?;
        let root = settings.root_dir();
        if !self.files.is_empty() && same_dir(&self.dir, root)? {
            return Err(Error::SameDirectory(self.dir.clone()));
        }
        let mut shared = 0;

        if self.prev_versions {
            let bytes = copy_plain(
                root.join(BACKUP_LOG_FILE_NAME),
                self.dir.join(SHARE_LOG_FILE_NAME),
            )?;
            info!("Shared backup log ({bytes} bytes) into {:?}", self.dir);
            shared += 1;
        }

        if !self.files.is_empty() {
            info!("Sharing {} into {:?}", describe_name_list(&self.files), self.dir);
        }
        for name in &self.files {
            copy_plain(root.join(name), self.dir.join(name))?;
            shared += 1;
        }

        Ok(shared)
    }
}

fn check_plain_file_name(name: &str) -> Result<()> {
    if Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name) {
        Ok(())
    } else {
        Err(Error::InvalidFileName(name.to_string()))
    }
}

fn same_dir<P1: AsRef<Path>, P2: AsRef<Path>>(a: P1, b: P2) -> Result<bool> {
    match b.as_ref().canonicalize() {
        Ok(b) => Ok(a.as_ref().canonicalize()? == b),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn copy_plain<P1: AsRef<Path>, P2: AsRef<Path>>(src: P1, dst: P2) -> Result<u64> {
    stream_file(src, dst, &EncryptorConfig::None)
}
