//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur during envelope encryption and key handling.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key bundle is unparsable, of the wrong suite, or missing a sub-key.
    #[error("malformed key bundle: {0}")]
    MalformedKey(String),

    /// Sealed blob is shorter than the fixed envelope header allows.
    /// Raised before any cryptographic computation is attempted.
    #[error("sealed blob too short: {len} bytes (minimum {min})")]
    TruncatedBlob { len: usize, min: usize },

    /// AEAD tag or OAEP padding verification failed: wrong key or
    /// tampered data. No partial plaintext is ever returned.
    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailure,

    /// The underlying cipher refused to encrypt. Surfaced so a failed
    /// encryption can never silently turn into a plaintext write.
    #[error("encryption failed: {0}")]
    EncryptionFailure(String),

    /// Key-pair generation failed. Not retryable.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),
}
