//! Envelope encryption layer for FieldVault.
//!
//! Provides per-identity field protection using:
//! - X25519 ephemeral key agreement + ChaCha20-Poly1305 (default suite)
//! - RSA-2048 OAEP-SHA256 (legacy suite)
//! - Typed key bundles with zeroization of private material
//!
//! # Architecture
//!
//! Each identity owns one long-term key pair, issued and held by the
//! custodian. The application side seals a sensitive field under the
//! identity's public bundle; the sealed blob is self-contained:
//!
//! 1. **Seal**: a fresh ephemeral X25519 key pair is generated per field,
//!    Diffie-Hellman with the recipient's public key yields a one-time
//!    shared secret, and ChaCha20-Poly1305 produces ciphertext + tag.
//!    The ephemeral secret and shared secret are used once and dropped.
//!
//! 2. **Open**: the custodian reconstructs the shared secret from its
//!    stored private key and the ephemeral public key carried in the blob,
//!    then verify-and-decrypts. A tag mismatch fails closed.
//!
//! The active suite is injected at construction; there is no process-wide
//! algorithm switch, so differently configured codecs can coexist in tests.

mod bundle;
mod envelope;
mod error;
mod keypair;

pub use bundle::{CipherSuite, PrivateKeyBundle, PublicKeyBundle};
pub use envelope::{
    EnvelopeCodec, EPHEMERAL_PUBLIC_KEY_SIZE, MIN_SEALED_LEN, NONCE_SIZE, TAG_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use keypair::{generate_keypair, RSA_KEY_BITS};
