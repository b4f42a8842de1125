//! Client error types.

use fieldvault_crypto::CryptoError;
use thiserror::Error;

/// Result type for application-side operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from the application-side encryptor and custodian client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Custodian answered with a non-success status.
    #[error("custodian returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
