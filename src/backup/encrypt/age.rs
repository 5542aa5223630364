use crate::backup::encrypt::{Encryptor, EncryptorBuilder};
use crate::backup::result_error::result::Result;
use ::age::armor::{ArmoredWriter, Format};
use ::age::stream::StreamWriter;
use ::age::x25519;
use std::io::Write;
use std::iter;
use std::sync::Arc;

/// Label attached to every generated recipient, shown in diagnostics only.
pub static DEFAULT_IDENTITY_LABEL: &str = "Backup";

/// Age stream whose ciphertext goes through an ASCII armor envelope.
pub type ArmoredAgeWriter<W> = StreamWriter<ArmoredWriter<W>>;

/// Configuration for Age encryption
///
/// Only ephemeral recipients are supported: a fresh X25519 key pair is
/// generated for every encrypted file and the private half is dropped as soon
/// as the recipient has been derived from it. Nothing written this way can be
/// decrypted again; there is no restore path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgeEncryptorConfig {
    EphemeralRecipient { label: Arc<str> },
}

impl AgeEncryptorConfig {
    pub fn ephemeral() -> Self {
        AgeEncryptorConfig::EphemeralRecipient {
            label: DEFAULT_IDENTITY_LABEL.into(),
        }
    }
}

impl<W: Write> EncryptorBuilder<W> for AgeEncryptorConfig {
    fn build_encryptor(&self, writer: W) -> Result<Encryptor<W>> {
        match self {
            AgeEncryptorConfig::EphemeralRecipient { label } => {
                let identity = x25519::Identity::generate();
                let recipient = identity.to_public();
                drop(identity);
                tracing::debug!("Initializing Age encryption for {label:?} recipient {recipient}");
                wrap_for_recipient(&recipient, writer).map(Encryptor::AgeEncryptor)
            }
        }
    }
}

/// Opens an armored Age stream addressed to a single recipient with the
/// library's default settings.
pub(crate) fn wrap_for_recipient<W: Write>(
    recipient: &x25519::Recipient,
    writer: W,
) -> Result<ArmoredAgeWriter<W>> {
    let armored = ArmoredWriter::wrap_output(writer, Format::AsciiArmor)?;
    let encryptor =
        ::age::Encryptor::with_recipients(iter::once(recipient as &dyn ::age::Recipient))?;
    Ok(encryptor.wrap_output(armored)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::finish::Finish;
    use ::age::armor::ArmoredReader;
    use std::io::Read;

    fn encrypt(recipient: &x25519::Recipient, plaintext: &[u8]) -> Vec<u8> {
        let mut writer = wrap_for_recipient(recipient, Vec::new()).unwrap();
        writer.write_all(plaintext).unwrap();
        writer.finish().unwrap().finish().unwrap()
    }

    #[test]
    fn test_ephemeral_default_label() {
        let AgeEncryptorConfig::EphemeralRecipient { label } = AgeEncryptorConfig::ephemeral();
        assert_eq!(label.as_ref(), "Backup");
    }

    #[test]
    fn test_armored_output_decrypts_with_matching_identity() {
        let identity = x25519::Identity::generate();
        let ciphertext = encrypt(&identity.to_public(), b"hello backup");

        let decryptor = ::age::Decryptor::new(ArmoredReader::new(ciphertext.as_slice())).unwrap();
        let mut reader = decryptor
            .decrypt(iter::once(&identity as &dyn ::age::Identity))
            .unwrap();
        let mut plaintext = Vec::new();
        reader.read_to_end(&mut plaintext).unwrap();

        assert_eq!(plaintext, b"hello backup");
    }

    #[test]
    fn test_armored_output_rejects_other_identity() {
        let ciphertext = encrypt(&x25519::Identity::generate().to_public(), b"hello backup");
        let stranger = x25519::Identity::generate();

        let decryptor = ::age::Decryptor::new(ArmoredReader::new(ciphertext.as_slice())).unwrap();
        let res = decryptor.decrypt(iter::once(&stranger as &dyn ::age::Identity));
        assert!(res.is_err());
    }

    #[test]
    fn test_each_build_uses_a_new_recipient() {
        let config = AgeEncryptorConfig::ephemeral();
        let mut outputs = Vec::new();
        for _ in 0..2 {
            let mut encryptor = config.build_encryptor(Vec::new()).unwrap();
            encryptor.write_all(b"same plaintext").unwrap();
            outputs.push(encryptor.finish().unwrap());
        }

        assert_ne!(outputs[0], outputs[1]);
    }

    #[test]
    fn test_empty_plaintext_is_still_armored() {
        let ciphertext = encrypt(&x25519::Identity::generate().to_public(), b"");
        let text = String::from_utf8(ciphertext).unwrap();

        assert!(text.starts_with("-----BEGIN AGE ENCRYPTED FILE-----"));
        assert!(text.trim_end().ends_with("-----END AGE ENCRYPTED FILE-----"));
    }
}
