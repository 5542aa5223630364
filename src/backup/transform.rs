use crate::backup::backup_job::BackupJob;
use crate::backup::encrypt::{EncryptorBuilder, EncryptorConfig};
use crate::backup::finish::Finish;
use crate::backup::policy::{self, Decision};
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::walker::FileEntry;
use std::fs::File;
use std::io::{BufWriter, IntoInnerError};
use std::path::Path;

/// What was written for one file. Byte counts are plaintext bytes read from
/// the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PlainCopy { bytes: u64 },
    ArmoredCiphertext { bytes: u64 },
}

impl Outcome {
    pub fn bytes(&self) -> u64 {
        match self {
            Outcome::PlainCopy { bytes } | Outcome::ArmoredCiphertext { bytes } => *bytes,
        }
    }
}

/// Copies or encrypts a single entry according to the job's flags.
pub fn process(entry: &FileEntry, job: &BackupJob) -> Result<Outcome> {
    apply(entry, policy::resolve(job, entry.file_name()))
}

pub(crate) fn apply(entry: &FileEntry, decision: Decision) -> Result<Outcome> {
    let bytes = stream_file(entry.source(), entry.destination(), &decision.encryptor())?;
    Ok(if decision.encrypts() {
        Outcome::ArmoredCiphertext { bytes }
    } else {
        Outcome::PlainCopy { bytes }
    })
}

/// Streams `src` into a freshly created (or truncated) `dst` through the
/// given encryptor, then closes the writer stack from the inside out.
pub(crate) fn stream_file<P1: AsRef<Path>, P2: AsRef<Path>>(
    src: P1,
    dst: P2,
    encryptor: &EncryptorConfig,
) -> Result<u64> {
    let mut reader = File::open(src.as_ref())?;
    let mut writer = File::create(dst.as_ref())
        .map(BufWriter::new)
        .map_err(Error::from)
        .and_then(|f| encryptor.build_encryptor(f))?;

    let bytes = std::io::copy(&mut reader, &mut writer)?;

    writer
        .finish()?
        .into_inner()
        .map_err(IntoInnerError::into_error)?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::policy::parse_name_list;
    use crate::backup::walker::TreeWalker;
    use itertools::Itertools;
    use tempfile::TempDir;

    fn entries(src: &Path, dst: &Path) -> Vec<FileEntry> {
        TreeWalker::builder()
            .src_dir(src)
            .dst_dir(dst)
            .build()
            .files()
            .unwrap()
            .map(|e| e.unwrap())
            .collect_vec()
    }

    fn job(src: &Path, dst: &Path, encrypt_all: bool, selective: &str) -> BackupJob {
        BackupJob::builder()
            .source_root(src)
            .destination_root(dst)
            .encrypt_all(encrypt_all)
            .selective(parse_name_list(selective))
            .build()
    }

    #[test]
    fn test_plain_copy_is_byte_identical() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        let content = (0..=255u8).cycle().take(100_000).collect_vec();
        std::fs::write(src.join("blob.bin"), &content).unwrap();

        let entry = entries(&src, &dst).remove(0);
        let outcome = process(&entry, &job(&src, &dst, false, "")).unwrap();

        assert_eq!(outcome, Outcome::PlainCopy { bytes: 100_000 });
        assert_eq!(std::fs::read(dst.join("blob.bin")).unwrap(), content);
    }

    #[test]
    fn test_encrypted_output_is_armored() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(src.join("secret.txt"), "top secret").unwrap();

        let entry = entries(&src, &dst).remove(0);
        let outcome = process(&entry, &job(&src, &dst, true, "")).unwrap();

        assert_eq!(outcome, Outcome::ArmoredCiphertext { bytes: 10 });
        assert_eq!(outcome.bytes(), 10);
        let out = std::fs::read_to_string(dst.join("secret.txt")).unwrap();
        assert!(out.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
        assert!(out.trim_end().ends_with("-----END AGE ENCRYPTED FILE-----"));
        assert!(!out.contains("top secret"));
    }

    #[test]
    fn test_existing_destination_is_truncated() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        let dst = temp_dir.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(src.join("a.txt"), "short").unwrap();
        std::fs::write(dst.join("a.txt"), "a much longer previous content").unwrap();

        let entry = entries(&src, &dst).remove(0);
        process(&entry, &job(&src, &dst, false, "")).unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("a.txt")).unwrap(), "short");
    }

    #[test]
    fn test_missing_source_fails_before_creating_destination() {
        let temp_dir = TempDir::new().unwrap();
        let dst = temp_dir.path().join("out.txt");

        let res = stream_file(temp_dir.path().join("missing"), &dst, &EncryptorConfig::None);

        assert!(matches!(res, Err(Error::Io(_))));
        assert!(!dst.exists());
    }

    #[test]
    fn test_missing_destination_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("in.txt");
        std::fs::write(&src, "data").unwrap();

        let res = stream_file(&src, temp_dir.path().join("nope/out.txt"), &EncryptorConfig::None);
        assert!(res.is_err());
    }
}
