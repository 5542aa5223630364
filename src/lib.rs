//! # flatback
//!
//! One-shot copy of a directory tree into a backup root, with optional
//! per-file encryption.
//!
//! ## Features
//!
//! - **Flattened copies**: every regular file lands directly in the backup
//!   root under its base name
//! - **Encryption**: Age encryption to a one-time X25519 recipient, written
//!   as an ASCII-armored envelope
//! - **Selective encryption**: encrypt everything, or only listed file names
//! - **Activity log**: one timestamped `Copied file` line per file in
//!   `backup.log`, which can be shared to another directory
//!
//! The private key of every encrypting run is discarded immediately, so
//! encrypted copies can never be decrypted. There is no restore path.
//!
//! ## Quick Start
//!
//! ```no_run
//! use flatback::backup::activity_log::FileActivityLog;
//! use flatback::backup::backup_job::BackupJob;
//! use flatback::backup::policy::parse_name_list;
//! use validator::Validate;
//!
//! let job = BackupJob::builder()
//!     .source_root("./documents")
//!     .destination_root("./backup")
//!     .selective(parse_name_list("passwords.txt,keys.txt"))
//!     .build();
//! job.validate()?;
//!
//! let mut log = FileActivityLog::open("./backup", "%Y-%m-%dT%H:%M:%S")?;
//! let summary = job.run(&mut log)?;
//! println!("{summary}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
