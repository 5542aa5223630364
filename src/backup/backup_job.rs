use crate::backup::activity_log::ActivityLog;
use crate::backup::policy::describe_name_list;
use crate::backup::result_error::result::Result;
use crate::backup::run::{BackupRun, BackupSummary};
use crate::backup::validate::{validate_dir_exist, validate_dir_exist_or_created, validate_not_nested};
use bon::Builder;
use getset::{CopyGetters, Getters};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::result;
use tracing::info;
use validator::{Validate, ValidationErrors};

/// A single backup invocation: which tree to copy, where to, and which files
/// to encrypt on the way.
///
/// Built once from the command line and never modified afterwards.
#[derive(Clone, Debug, Builder, PartialEq, Eq, Getters, CopyGetters)]
pub struct BackupJob {
    #[builder(into)]
    #[getset(get = "pub")]
    source_root: PathBuf,
    #[builder(into)]
    #[getset(get = "pub")]
    destination_root: PathBuf,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    encrypt_all: bool,
    #[builder(default)]
    #[getset(get_copy = "pub")]
    recursive_encrypt: bool,
    /// Base names encrypted even when neither flag above is set.
    #[builder(default, into)]
    #[getset(get = "pub")]
    selective: BTreeSet<String>,
}

impl Validate for BackupJob {
    /// Checks the source exists and the destination is not inside it, then
    /// creates the destination when needed.
    ///
    /// Nothing is created unless both checks pass.
    fn validate(&self) -> result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_dir_exist(&self.source_root) {
            errors.add("source_root", e);
        } else if let Err(e) = validate_not_nested(&self.source_root, &self.destination_root) {
            errors.add("destination_root", e);
        } else if let Err(e) = validate_dir_exist_or_created(&self.destination_root) {
            errors.add("destination_root", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl BackupJob {
    /// Copies every file under the source root into the destination root.
    ///
    /// Stops at the first error; files written before it stay in place.
    pub fn run<L: ActivityLog + ?Sized>(&self, log: &mut L) -> Result<BackupSummary> {
        info!(
            "Starting backup {:?} -> {:?} (encrypt: {}, recursive: {}, selective: {})",
            self.source_root,
            self.destination_root,
            self.encrypt_all,
            self.recursive_encrypt,
            describe_name_list(&self.selective)
        );

        let summary = BackupRun::new(self, log).execute()?;
        info!("Backup finished: {summary}");
        Ok(summary)
    }
}
