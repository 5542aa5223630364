use crate::backup::result_error::WithMsg;
use crate::backup::run::Stage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),
    #[error(transparent)]
    AgeEncrypt(#[from] age::EncryptError),
    #[error(transparent)]
    ValidationError(#[from] validator::ValidationErrors),
    #[error(transparent)]
    SerdeYml(#[from] serde_yml::Error),
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),
    #[error("Not a plain file name: {0:?}")]
    InvalidFileName(String),
    #[error("Share directory is the backup root: {0:?}")]
    SameDirectory(PathBuf),
    #[error("Backup run already ended: {0}")]
    RunEnded(Stage),
    #[error("{}:\n{}", msg, indent::indent_all_with("  ", error.to_string()))]
    WithMsg { msg: String, error: Box<Error> },
}

impl<S: Into<String>> WithMsg<S> for Error {
    fn with_msg(self, msg: S) -> Self {
        Self::WithMsg {
            msg: msg.into(),
            error: Box::new(self),
        }
    }
}
