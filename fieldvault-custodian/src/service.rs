//! Custodian service: the per-request protocol behind the HTTP surface.
//!
//! Every request walks the same gate sequence: received → identity
//! resolved → authorized → key loaded → completed. Any failed gate exits
//! immediately via `?`; nothing is retried, since retrying a failed
//! authentication with fresh randomness could mask tampering.

use crate::auth::CredentialVerifier;
use crate::error::{CustodianError, CustodianResult};
use crate::store::{KeyStore, StoreError};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use fieldvault_crypto::{
    generate_keypair, CipherSuite, EnvelopeCodec, PrivateKeyBundle,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How `issue` treats an identity that already has a key record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueMode {
    /// Default: return the existing public bundle, generate nothing.
    CreateIfAbsent,
    /// Explicit rotation. Every field sealed under the previous key
    /// becomes permanently undecryptable.
    ForceRotate,
}

/// The custodian's three operations, independent of transport.
pub struct CustodianService {
    store: KeyStore,
    codec: EnvelopeCodec,
    verifier: Arc<dyn CredentialVerifier>,
}

impl CustodianService {
    pub fn new(store: KeyStore, suite: CipherSuite, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            store,
            codec: EnvelopeCodec::new(suite),
            verifier,
        }
    }

    pub fn suite(&self) -> CipherSuite {
        self.codec.suite()
    }

    /// Issues a key pair for an identity and returns the public bundle
    /// (base64 transport encoding). The private half goes straight into
    /// the store and is never part of the return value.
    pub fn issue(&self, identity: &str, mode: IssueMode) -> CustodianResult<String> {
        if mode == IssueMode::CreateIfAbsent {
            if let Some(existing) = self.store.get(identity)? {
                debug!(%identity, "issue: returning existing public bundle");
                return Ok(existing.public_bundle);
            }
        }

        let (public, private) = generate_keypair(self.codec.suite())?;
        let public_bundle = public.to_base64()?;
        let private_bundle = private.to_base64()?;

        match mode {
            IssueMode::CreateIfAbsent => {
                match self.store.insert(identity, &public_bundle, &private_bundle) {
                    Ok(()) => {}
                    // Lost a create race; the record that won is authoritative.
                    Err(StoreError::Duplicate(_)) => {
                        let existing = self
                            .store
                            .get(identity)?
                            .ok_or_else(|| CustodianError::IdentityNotFound(identity.to_string()))?;
                        return Ok(existing.public_bundle);
                    }
                    Err(e) => return Err(e.into()),
                }
                info!(%identity, suite = %self.codec.suite(), "issued key pair");
            }
            IssueMode::ForceRotate => {
                self.store.replace(identity, &public_bundle, &private_bundle)?;
                warn!(%identity, "force-rotated key pair; previously sealed fields are now undecryptable");
            }
        }

        Ok(public_bundle)
    }

    /// Decrypts a sealed field on behalf of the credential's subject.
    ///
    /// The identity whose key is used comes exclusively from the verified
    /// credential; there is no identity parameter, so a caller cannot
    /// decrypt another identity's stored ciphertext by naming them.
    /// The returned plaintext is never cached or logged; if the caller is
    /// gone by the time this returns, it is simply dropped.
    pub fn decrypt_on_behalf(
        &self,
        credential: &str,
        ciphertext_b64: &str,
    ) -> CustodianResult<String> {
        let identity = self.verifier.verify(credential)?;
        debug!(%identity, "identity resolved from credential");

        let record = self
            .store
            .get(&identity)?
            .ok_or_else(|| CustodianError::IdentityNotFound(identity.clone()))?;
        debug!(%identity, "key record loaded");

        let private = PrivateKeyBundle::from_base64(&record.private_bundle)?;
        let sealed = BASE64
            .decode(ciphertext_b64)
            .map_err(|_| CustodianError::CiphertextEncoding)?;

        let plaintext = self.codec.open(&private, &sealed)?;
        String::from_utf8(plaintext).map_err(|_| CustodianError::PlaintextNotUtf8)
    }

    /// Deletes an identity's key record. Idempotent.
    pub fn delete(&self, identity: &str) -> CustodianResult<()> {
        self.store.delete(identity)?;
        info!(%identity, "key record deleted");
        Ok(())
    }
}
