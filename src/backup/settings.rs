use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use crate::backup::validate::validate_strftime;
use bon::Builder;
use getset::Getters;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::path::{Path, PathBuf};
use validator::Validate;

pub static DEFAULT_ROOT_DIR: &str = "./backup";
pub static DEFAULT_LOGGER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn default_root_dir() -> PathBuf {
    DEFAULT_ROOT_DIR.into()
}

fn default_logger_format() -> String {
    DEFAULT_LOGGER_FORMAT.into()
}

/// Settings shared by every subcommand.
///
/// Read from an optional YAML file, then overridden by command line flags.
/// ```yaml
/// root_dir: /var/backups/home
/// logger_format: "%Y-%m-%d %H:%M:%S"
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder, PartialEq, Eq, Getters)]
#[serde(deny_unknown_fields)]
#[getset(get = "pub")]
pub struct Settings {
    /// Directory receiving the backed up files and `backup.log`
    #[serde(default = "default_root_dir")]
    #[builder(default = default_root_dir(), into)]
    root_dir: PathBuf,
    /// `chrono` strftime format of the activity log timestamps
    #[validate(custom(function = validate_strftime))]
    #[serde(default = "default_logger_format")]
    #[builder(default = default_logger_format(), into)]
    logger_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::builder().build()
    }
}

impl Display for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Root Directory: {}", self.root_dir.display())?;
        write!(f, "Logger Format: {}", self.logger_format)
    }
}

impl Settings {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        File::open(path).map_err(Error::from).and_then(|f| {
            serde_yml::from_reader::<_, Settings>(f)
                .map_err(Error::from)
                .with_msg(format!("Parse YAML config failed: {:?}", path))
        })
    }

    pub fn with_overrides(self, root_dir: Option<PathBuf>, logger_format: Option<String>) -> Self {
        Settings {
            root_dir: root_dir.unwrap_or(self.root_dir),
            logger_format: logger_format.unwrap_or(self.logger_format),
        }
    }
}
