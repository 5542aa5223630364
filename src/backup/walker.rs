use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;

use bon::Builder;
use dyn_iter::{DynIter, IntoDynIterator};
use getset::{CopyGetters, Getters};
use walkdir::{DirEntry, WalkDir};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// One filesystem node found under the source root, paired with the place
/// its copy goes.
///
/// The destination keeps only the base name, so files from different
/// subdirectories land side by side in the destination root.
#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters)]
pub struct FileEntry {
    #[getset(get = "pub")]
    source: PathBuf,
    #[getset(get = "pub")]
    destination: PathBuf,
    #[getset(get_copy = "pub")]
    is_directory: bool,
}

impl FileEntry {
    fn from_dir_entry<P: AsRef<Path>>(de: DirEntry, dst_dir: P) -> FileEntry {
        let destination = dst_dir.as_ref().join(de.file_name());
        let is_directory = de.file_type().is_dir();
        FileEntry {
            source: de.into_path(),
            destination,
            is_directory,
        }
    }

    pub fn file_name(&self) -> &OsStr {
        self.destination.file_name().unwrap_or_default()
    }
}

/// Depth-first walk of a source directory.
///
/// Entries of a directory are visited in file name order. Symbolic links
/// are reported as they are and never descended into.
#[derive(Clone, Debug, Builder, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct TreeWalker {
    #[builder(into)]
    src_dir: PathBuf,
    #[builder(into)]
    dst_dir: PathBuf,
}

impl TreeWalker {
    /// Every node under `src_dir`, the root directory included.
    ///
    /// The first error is yielded like any other item; callers stop there.
    pub fn entries<'a>(&self) -> Result<DynIter<'a, Result<FileEntry>>> {
        if !self.src_dir.is_dir() {
            tracing::error!(
                "Source directory does not exist or is not a directory: {:?}",
                self.src_dir
            );
            return Err(Error::NotADirectory(self.src_dir.clone()));
        }

        tracing::debug!("Scanning directory {:?}", self.src_dir);
        let dst_dir = self.dst_dir.clone();

        let entries = WalkDir::new(&self.src_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .map(move |res| {
                res.map(|de| FileEntry::from_dir_entry(de, &dst_dir))
                    .map_err(Error::from)
            });

        Ok(entries.into_dyn_iter())
    }

    /// Same walk as [`TreeWalker::entries`] with directories left out.
    pub fn files<'a>(&self) -> Result<DynIter<'a, Result<FileEntry>>> {
        let files = self.entries()?.filter(|res| match res {
            Ok(entry) if entry.is_directory => {
                tracing::trace!("Skipping {:?} not a file", entry.source);
                false
            }
            _ => true,
        });

        Ok(files.into_dyn_iter())
    }
}
