//! The AEAD envelope codec.
//!
//! Seal layout for the X25519 suite:
//!
//! ```text
//! ephemeral_pk (32) ‖ nonce (12) ‖ ciphertext ‖ tag (16)
//! ```
//!
//! The legacy RSA suite produces a single OAEP block sized to the modulus;
//! no length prefix is needed since RSA ciphertext length is fixed per key.
//!
//! A blob is meaningful only relative to the key pair used to produce it.
//! It carries no identity reference; callers supply the identity
//! out-of-band to locate the right private key.

use crate::bundle::{CipherSuite, PrivateKeyBundle, PublicKeyBundle};
use crate::error::{CryptoError, CryptoResult};
use chacha20poly1305::{aead::Aead, ChaCha20Poly1305, Key, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

/// Ephemeral X25519 public key length.
pub const EPHEMERAL_PUBLIC_KEY_SIZE: usize = 32;

/// ChaCha20-Poly1305 nonce length.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag length.
pub const TAG_SIZE: usize = 16;

/// Shortest well-formed X25519-suite blob (empty plaintext).
pub const MIN_SEALED_LEN: usize = EPHEMERAL_PUBLIC_KEY_SIZE + NONCE_SIZE + TAG_SIZE;

/// Stateless seal/open codec for one configured cipher suite.
///
/// The suite is fixed at construction. A bundle of the other suite is
/// rejected with [`CryptoError::MalformedKey`]: configuration decides the
/// algorithm, never attacker-supplied data.
#[derive(Clone, Copy, Debug)]
pub struct EnvelopeCodec {
    suite: CipherSuite,
}

impl EnvelopeCodec {
    pub fn new(suite: CipherSuite) -> Self {
        Self { suite }
    }

    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Seals a plaintext field under the recipient's public bundle.
    ///
    /// A fresh ephemeral key pair and nonce are drawn per call; the shared
    /// secret and ephemeral secret are used exactly once and dropped
    /// (both zeroize on drop), never persisted.
    pub fn seal(&self, recipient: &PublicKeyBundle, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        self.check_suite(recipient.suite())?;
        match recipient {
            PublicKeyBundle::X25519 { encryption, .. } => seal_x25519(encryption, plaintext),
            PublicKeyBundle::Rsa { public_key_der } => seal_rsa(public_key_der, plaintext),
        }
    }

    /// Opens a sealed blob with the recipient's private bundle.
    ///
    /// Fails closed: a tag or padding mismatch returns
    /// [`CryptoError::AuthenticationFailure`] and no partial plaintext.
    pub fn open(&self, recipient: &PrivateKeyBundle, sealed: &[u8]) -> CryptoResult<Vec<u8>> {
        self.check_suite(recipient.suite())?;
        match recipient {
            PrivateKeyBundle::X25519 { encryption, .. } => open_x25519(encryption, sealed),
            PrivateKeyBundle::Rsa { private_key_der } => open_rsa(private_key_der, sealed),
        }
    }

    fn check_suite(&self, bundle_suite: CipherSuite) -> CryptoResult<()> {
        if bundle_suite != self.suite {
            return Err(CryptoError::MalformedKey(format!(
                "bundle is {bundle_suite}, codec configured for {}",
                self.suite
            )));
        }
        Ok(())
    }
}

fn seal_x25519(recipient_pk: &[u8; 32], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let recipient_pk = PublicKey::from(*recipient_pk);

    // EphemeralSecret is consumed by the DH; single use is type-enforced.
    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_pk = PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&recipient_pk);

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(shared.as_bytes()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::EncryptionFailure("AEAD seal failed".to_string()))?;

    let mut sealed =
        Vec::with_capacity(EPHEMERAL_PUBLIC_KEY_SIZE + NONCE_SIZE + ciphertext.len());
    sealed.extend_from_slice(ephemeral_pk.as_bytes());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

fn open_x25519(recipient_sk: &[u8; 32], sealed: &[u8]) -> CryptoResult<Vec<u8>> {
    // Length gate before any cryptographic computation.
    if sealed.len() < MIN_SEALED_LEN {
        return Err(CryptoError::TruncatedBlob {
            len: sealed.len(),
            min: MIN_SEALED_LEN,
        });
    }

    let mut ephemeral_pk = [0u8; EPHEMERAL_PUBLIC_KEY_SIZE];
    ephemeral_pk.copy_from_slice(&sealed[..EPHEMERAL_PUBLIC_KEY_SIZE]);
    let nonce = &sealed[EPHEMERAL_PUBLIC_KEY_SIZE..EPHEMERAL_PUBLIC_KEY_SIZE + NONCE_SIZE];
    let ciphertext = &sealed[EPHEMERAL_PUBLIC_KEY_SIZE + NONCE_SIZE..];

    let secret = StaticSecret::from(*recipient_sk);
    let shared = secret.diffie_hellman(&PublicKey::from(ephemeral_pk));

    let cipher = ChaCha20Poly1305::new(Key::from_slice(shared.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailure)
}

fn seal_rsa(public_key_der: &[u8], plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let public_key = RsaPublicKey::from_public_key_der(public_key_der)
        .map_err(|e| CryptoError::MalformedKey(format!("RSA public key: {e}")))?;

    let mut rng = OsRng;
    public_key
        .encrypt(&mut rng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| CryptoError::EncryptionFailure(format!("OAEP encrypt: {e}")))
}

fn open_rsa(private_key_der: &[u8], sealed: &[u8]) -> CryptoResult<Vec<u8>> {
    let private_key = RsaPrivateKey::from_pkcs8_der(private_key_der)
        .map_err(|e| CryptoError::MalformedKey(format!("RSA private key: {e}")))?;

    // Padding or hash mismatch fails closed, indistinguishable from a tag
    // mismatch on the X25519 suite.
    private_key
        .decrypt(Oaep::new::<Sha256>(), sealed)
        .map_err(|_| CryptoError::AuthenticationFailure)
}
