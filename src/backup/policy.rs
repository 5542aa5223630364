//! Per-file encryption decision.
//!
//! The flags are checked in a fixed order: `encrypt_all`, then
//! `recursive_encrypt`, then the selective name list. The first one that
//! applies decides; a file matched by none of them is copied verbatim.

use crate::backup::backup_job::BackupJob;
use crate::backup::encrypt::age::AgeEncryptorConfig;
use crate::backup::encrypt::EncryptorConfig;
use derive_more::Display;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::ffi::OsStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Decision {
    #[display("encrypt (all)")]
    EncryptAll,
    #[display("encrypt (recursive)")]
    EncryptRecursive,
    #[display("encrypt (selective)")]
    EncryptSelected,
    #[display("plain copy")]
    Plain,
}

impl Decision {
    pub fn encrypts(self) -> bool {
        self != Decision::Plain
    }

    pub fn encryptor(self) -> EncryptorConfig {
        if self.encrypts() {
            EncryptorConfig::Age(AgeEncryptorConfig::ephemeral())
        } else {
            EncryptorConfig::None
        }
    }
}

pub fn resolve(job: &BackupJob, file_name: &OsStr) -> Decision {
    if job.encrypt_all() {
        Decision::EncryptAll
    } else if job.recursive_encrypt() {
        // Same observable effect as encrypt_all.
        Decision::EncryptRecursive
    } else if file_name
        .to_str()
        .is_some_and(|name| job.selective().contains(name))
    {
        Decision::EncryptSelected
    } else {
        Decision::Plain
    }
}

/// Splits a comma-separated list of file names, trimming blanks and dropping
/// empty items.
pub fn parse_name_list<S: AsRef<str>>(list: S) -> BTreeSet<String> {
    list.as_ref()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

pub fn describe_name_list(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        "<none>".into()
    } else {
        names.iter().join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(encrypt_all: bool, recursive_encrypt: bool, selective: &str) -> BackupJob {
        BackupJob::builder()
            .source_root("src")
            .destination_root("dst")
            .encrypt_all(encrypt_all)
            .recursive_encrypt(recursive_encrypt)
            .selective(parse_name_list(selective))
            .build()
    }

    #[test]
    fn test_parse_name_list() {
        let names = parse_name_list(" a.txt, b.txt ,,c.txt,");
        assert_eq!(
            names.into_iter().collect_vec(),
            vec!["a.txt", "b.txt", "c.txt"]
        );
        assert!(parse_name_list("").is_empty());
        assert!(parse_name_list(" , ").is_empty());
    }

    #[test]
    fn test_describe_name_list() {
        assert_eq!(describe_name_list(&BTreeSet::new()), "<none>");
        assert_eq!(describe_name_list(&parse_name_list("b,a")), "a,b");
    }

    #[test]
    fn test_no_flags_is_plain() {
        let job = job(false, false, "");
        assert_eq!(resolve(&job, OsStr::new("a.txt")), Decision::Plain);
        assert_eq!(Decision::Plain.encryptor(), EncryptorConfig::None);
    }

    #[test]
    fn test_encrypt_all_wins_first() {
        let job = job(true, true, "a.txt");
        assert_eq!(resolve(&job, OsStr::new("a.txt")), Decision::EncryptAll);
        assert_eq!(resolve(&job, OsStr::new("b.txt")), Decision::EncryptAll);
    }

    #[test]
    fn test_recursive_encrypts_everything() {
        let job = job(false, true, "a.txt");
        assert_eq!(resolve(&job, OsStr::new("a.txt")), Decision::EncryptRecursive);
        assert_eq!(resolve(&job, OsStr::new("b.txt")), Decision::EncryptRecursive);
    }

    #[test]
    fn test_selective_matches_base_name_exactly() {
        let job = job(false, false, "a.txt");
        assert_eq!(resolve(&job, OsStr::new("a.txt")), Decision::EncryptSelected);
        assert_eq!(resolve(&job, OsStr::new("b.txt")), Decision::Plain);
        assert_eq!(resolve(&job, OsStr::new("A.TXT")), Decision::Plain);
        assert_eq!(resolve(&job, OsStr::new("a.txt.bak")), Decision::Plain);
    }

    #[test]
    fn test_encrypting_decisions_use_ephemeral_age() {
        for decision in [
            Decision::EncryptAll,
            Decision::EncryptRecursive,
            Decision::EncryptSelected,
        ] {
            assert!(decision.encrypts());
            assert_eq!(
                decision.encryptor(),
                EncryptorConfig::Age(AgeEncryptorConfig::ephemeral())
            );
        }
    }
}
