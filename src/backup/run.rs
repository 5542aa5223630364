use crate::backup::activity_log::ActivityLog;
use crate::backup::backup_job::BackupJob;
use crate::backup::policy;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::transform::{self, Outcome};
use crate::backup::validate::resolve_path;
use crate::backup::walker::{FileEntry, TreeWalker};
use derive_more::Display;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, trace, warn};

/// Where a [`BackupRun`] currently is.
///
/// `Scanning -> EmittingEntry -> (Encrypting | Copying) -> Logging -> Scanning`,
/// or straight back to `Scanning` for a skipped entry, leaving the loop through `Finished` once the walk is exhausted or through
/// `Aborted` on the first error. Both exits are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    Scanning,
    EmittingEntry,
    Encrypting,
    Copying,
    Logging,
    Finished,
    Aborted,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Finished | Stage::Aborted)
    }

    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        match (self, next) {
            (Finished | Aborted, _) => false,
            (_, Aborted) => true,
            (Scanning, EmittingEntry | Finished) => true,
            (EmittingEntry, Encrypting | Copying | Scanning) => true,
            (Encrypting | Copying, Logging) => true,
            (Logging, Scanning) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
#[display("{plain} copied, {encrypted} encrypted, {bytes} bytes")]
pub struct BackupSummary {
    pub plain: usize,
    pub encrypted: usize,
    pub bytes: u64,
}

impl BackupSummary {
    pub fn files(&self) -> usize {
        self.plain + self.encrypted
    }

    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlainCopy { .. } => self.plain += 1,
            Outcome::ArmoredCiphertext { .. } => self.encrypted += 1,
        }
        self.bytes += outcome.bytes();
    }
}

/// One pass of a [`BackupJob`]: walks the source tree and processes every
/// file in order, one at a time, stopping at the first error.
pub struct BackupRun<'a, L: ActivityLog + ?Sized> {
    job: &'a BackupJob,
    log: &'a mut L,
    stage: Stage,
    summary: BackupSummary,
    destinations: HashSet<PathBuf>,
}

impl<'a, L: ActivityLog + ?Sized> BackupRun<'a, L> {
    pub fn new(job: &'a BackupJob, log: &'a mut L) -> Self {
        Self {
            job,
            log,
            stage: Stage::Scanning,
            summary: BackupSummary::default(),
            destinations: HashSet::new(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn summary(&self) -> BackupSummary {
        self.summary
    }

    pub fn execute(&mut self) -> Result<BackupSummary> {
        if self.stage.is_terminal() {
            return Err(Error::RunEnded(self.stage));
        }

        match self.drive() {
            Ok(()) => {
                self.advance(Stage::Finished);
                Ok(self.summary)
            }
            Err(e) => {
                self.advance(Stage::Aborted);
                Err(e)
            }
        }
    }

    fn drive(&mut self) -> Result<()> {
        let walker = TreeWalker::builder()
            .src_dir(self.job.source_root())
            .dst_dir(self.job.destination_root())
            .build();

        for entry in walker.files()? {
            let entry = entry?;
            self.advance(Stage::EmittingEntry);
            self.handle(&entry)?;
            self.advance(Stage::Scanning);
        }

        Ok(())
    }

    fn handle(&mut self, entry: &FileEntry) -> Result<()> {
        if self.is_log_location(entry.destination()) {
            warn!(
                "Skipping {:?}: its copy would overwrite the backup log at {:?}",
                entry.source(),
                entry.destination()
            );
            return Ok(());
        }

        if !self.destinations.insert(entry.destination().clone()) {
            warn!(
                "{:?} overwrites an earlier file with the same name at {:?}",
                entry.source(),
                entry.destination()
            );
        }

        let decision = policy::resolve(self.job, entry.file_name());
        self.advance(if decision.encrypts() {
            Stage::Encrypting
        } else {
            Stage::Copying
        });
        trace!("{:?}: {decision}", entry.source());
        let outcome = transform::apply(entry, decision)?;
        self.summary.add(outcome);

        self.advance(Stage::Logging);
        self.log.record(entry.source())?;
        info!("Copied file: {}", entry.source().display());
        Ok(())
    }

    fn is_log_location(&self, destination: &Path) -> bool {
        match self.log.location() {
            Some(location) if location.file_name() == destination.file_name() => {
                match (resolve_path(location), resolve_path(destination)) {
                    (Ok(a), Ok(b)) => a == b,
                    _ => location == destination,
                }
            }
            _ => false,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "invalid transition {} -> {}",
            self.stage,
            next
        );
        trace!("Backup stage {} -> {}", self.stage, next);
        self.stage = next;
    }
}
