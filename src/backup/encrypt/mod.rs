pub mod age;

use crate::backup::encrypt::age::{AgeEncryptorConfig, ArmoredAgeWriter};
use crate::backup::finish::Finish;
use crate::backup::result_error::result::Result;
use io_enum::Write;
use std::io::{Error, Write};
use std::result;

/// Writer sitting between the file reader and the destination file.
#[derive(Write)]
pub enum Encryptor<W: Write> {
    None(W),
    AgeEncryptor(ArmoredAgeWriter<W>),
}

#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub enum EncryptorConfig {
    #[default]
    None,
    Age(AgeEncryptorConfig),
}

pub trait EncryptorBuilder<W: Write> {
    fn build_encryptor(&self, writer: W) -> Result<Encryptor<W>>;
}

impl<W: Write> Finish<W> for Encryptor<W> {
    /// Closes the encrypted stream first, then the armor, and hands back the
    /// destination writer.
    fn finish(self) -> result::Result<W, Error> {
        match self {
            Encryptor::None(w) => Ok(w),
            Encryptor::AgeEncryptor(w) => w.finish()?.finish(),
        }
    }
}

impl<W: Write> EncryptorBuilder<W> for EncryptorConfig {
    fn build_encryptor(&self, writer: W) -> Result<Encryptor<W>> {
        match self {
            EncryptorConfig::None => {
                tracing::trace!("Using no encryption");
                Ok(Encryptor::None(writer))
            }
            EncryptorConfig::Age(age) => age.build_encryptor(writer),
        }
    }
}
