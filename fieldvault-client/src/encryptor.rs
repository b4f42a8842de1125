//! Application-side field encryptor.
//!
//! Wraps the envelope codec around a previously issued public bundle.
//! Called once per sensitive field at write time; the application stores
//! only what this returns.

use crate::error::{ClientError, ClientResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use fieldvault_crypto::{CipherSuite, CryptoError, EnvelopeCodec, PublicKeyBundle};

/// Seals sensitive fields under one identity's public bundle.
///
/// The bundle is parsed from its transport encoding exactly once, at
/// construction. On any sealing error the caller must abort its write;
/// there is no fallback that stores plaintext.
#[derive(Debug)]
pub struct FieldEncryptor {
    codec: EnvelopeCodec,
    recipient: PublicKeyBundle,
}

impl FieldEncryptor {
    /// Parses the issued public bundle and binds it to the configured
    /// suite. A bundle of the wrong suite fails here, not at write time.
    pub fn new(suite: CipherSuite, public_bundle_b64: &str) -> ClientResult<Self> {
        let recipient = PublicKeyBundle::from_base64(public_bundle_b64)?;
        if recipient.suite() != suite {
            return Err(ClientError::Crypto(CryptoError::MalformedKey(format!(
                "bundle is {}, encryptor configured for {suite}",
                recipient.suite()
            ))));
        }
        Ok(Self {
            codec: EnvelopeCodec::new(suite),
            recipient,
        })
    }

    /// Seals one field, returning the base64-encoded blob to persist.
    pub fn encrypt_field(&self, plaintext: &str) -> ClientResult<String> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// Byte-level variant of [`FieldEncryptor::encrypt_field`].
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> ClientResult<String> {
        let sealed = self.codec.seal(&self.recipient, plaintext)?;
        Ok(BASE64.encode(sealed))
    }
}
