//! Custodian error types and their HTTP mapping.

use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fieldvault_crypto::CryptoError;
use thiserror::Error;

/// Result type for custodian operations.
pub type CustodianResult<T> = Result<T, CustodianError>;

/// Errors that can occur while serving custodian requests.
#[derive(Debug, Error)]
pub enum CustodianError {
    /// Peer address failed the origin allowlist. Nothing else ran.
    #[error("origin not allowed")]
    OriginDenied,

    /// Bearer credential failed signature or expiry verification.
    #[error("credential rejected: {0}")]
    CredentialInvalid(String),

    /// No key record exists for the resolved identity.
    #[error("no key record for {0}")]
    IdentityNotFound(String),

    /// Request ciphertext was not valid base64.
    #[error("ciphertext is not valid base64")]
    CiphertextEncoding,

    /// Decryption produced bytes that are not UTF-8. Fail closed; the
    /// plaintext is discarded rather than guessed at.
    #[error("decrypted payload is not valid UTF-8")]
    PlaintextNotUtf8,

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl CustodianError {
    /// Status and external message for this error.
    ///
    /// `CredentialInvalid` and `AuthenticationFailure` (and a ciphertext
    /// that cannot be decoded at all) collapse into one generic
    /// "decryption failed" response so an external caller cannot use the
    /// distinction as an oracle. The distinct causes still reach the log.
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            CustodianError::OriginDenied => (StatusCode::FORBIDDEN, "origin not allowed"),
            CustodianError::IdentityNotFound(_) => (StatusCode::NOT_FOUND, "identity not found"),
            CustodianError::CredentialInvalid(_)
            | CustodianError::CiphertextEncoding
            | CustodianError::Crypto(CryptoError::AuthenticationFailure)
            | CustodianError::Crypto(CryptoError::TruncatedBlob { .. }) => {
                (StatusCode::BAD_REQUEST, "decryption failed")
            }
            CustodianError::Storage(StoreError::Duplicate(_)) => {
                (StatusCode::CONFLICT, "key already issued")
            }
            CustodianError::PlaintextNotUtf8
            | CustodianError::Storage(_)
            | CustodianError::Crypto(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        }
    }
}

impl IntoResponse for CustodianError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        // Internal log keeps the distinct cause; the response body does not.
        // Display output never contains key material or plaintext.
        if status.is_server_error() {
            tracing::error!(cause = %self, status = %status, "request failed");
        } else {
            tracing::warn!(cause = %self, status = %status, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
