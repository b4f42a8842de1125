//! Authorization bridge: resolves a bearer credential to an identity.
//!
//! Credentials are HS256 JWTs carrying `sub` (the identity) and `exp`.
//! Verification checks signature and expiry; no other claims are consumed.
//! The trait seam exists so tests can instrument that the origin gate
//! short-circuits before any credential is parsed.

use crate::error::{CustodianError, CustodianResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims consumed by the custodian.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity the credential is bound to.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

/// Resolves a bearer credential to the subject identity it asserts.
pub trait CredentialVerifier: Send + Sync {
    /// Returns the verified subject identity, or `CredentialInvalid`.
    fn verify(&self, credential: &str) -> CustodianResult<String>;
}

/// Production verifier: HS256 signature + expiry.
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl CredentialVerifier for JwtVerifier {
    fn verify(&self, credential: &str) -> CustodianResult<String> {
        let data = decode::<Claims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| CustodianError::CredentialInvalid(e.to_string()))?;
        Ok(data.claims.sub)
    }
}

/// Issues a time-bounded credential for an identity.
///
/// This is the collaborator interface the application tier's login flow
/// provides; it lives here so tests and tooling can mint credentials
/// against the same claim shape the verifier expects.
pub fn issue_credential(identity: &str, secret: &str, ttl: Duration) -> CustodianResult<String> {
    let exp = (Utc::now() + ttl).timestamp().max(0) as usize;
    let claims = Claims {
        sub: identity.to_string(),
        exp,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CustodianError::CredentialInvalid(e.to_string()))
}
