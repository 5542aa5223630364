//! Validation functions for configuration values.
//!
//! Provides custom validation functions for source and destination
//! directories and for the timestamp format of the activity log.

use chrono::format::{Item, StrftimeItems};
use validator::ValidationError;

use std::path::{Path, PathBuf};

pub fn validate_dir_exist<P: AsRef<Path>>(dir: P) -> Result<(), ValidationError> {
    let dir = dir.as_ref();
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ValidationError::new("InvalidDirectory")
                .with_message(format!("{:?} is not a directory", dir).into()));
        }
    } else {
        return Err(ValidationError::new("InvalidDirectory")
            .with_message(format!("{:?} not found", dir).into()));
    }

    Ok(())
}

pub fn validate_dir_exist_or_created<P: AsRef<Path>>(dir: P) -> Result<(), ValidationError> {
    let dir = dir.as_ref();
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ValidationError::new("InvalidDirectory")
                .with_message(format!("{:?} is not a directory", dir).into()));
        }
    } else {
        return std::fs::create_dir_all(dir).map_err(|e| {
            ValidationError::new("InvalidDirectory").with_message(
                format!("cannot create or access directory {:?}: {}", dir, e).into(),
            )
        });
    }

    Ok(())
}

/// Rejects a destination that lies inside the source tree, which would make
/// the walk visit its own output.
///
/// The destination does not have to exist yet.
pub fn validate_not_nested<P1: AsRef<Path>, P2: AsRef<Path>>(
    src_dir: P1,
    dst_dir: P2,
) -> Result<(), ValidationError> {
    let (src_dir, dst_dir) = (src_dir.as_ref(), dst_dir.as_ref());
    let (Ok(src), Ok(dst)) = (resolve_path(src_dir), resolve_path(dst_dir)) else {
        return Err(ValidationError::new("InvalidDirectory").with_message(
            format!("cannot resolve {:?} or {:?}", src_dir, dst_dir).into(),
        ));
    };

    if dst.starts_with(&src) {
        return Err(ValidationError::new("NestedDestination").with_message(
            format!("destination {:?} is inside source {:?}", dst_dir, src_dir).into(),
        ));
    }

    Ok(())
}

/// Absolute form of `path` with its longest existing prefix canonicalized
/// and the missing tail appended as written.
pub fn resolve_path<P: AsRef<Path>>(path: P) -> std::io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return Ok(missing.iter().rev().fold(canonical, |acc, name| acc.join(name)));
        }
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return Ok(absolute.clone()),
        }
    }
}

pub fn validate_strftime<S: AsRef<str>>(format: S) -> Result<(), ValidationError> {
    let format = format.as_ref();
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ValidationError::new("InvalidTimeFormat")
            .with_message(format!("Invalid strftime format: {format:?}").into()));
    }

    Ok(())
}
