//! Key-pair generation.

use crate::bundle::{CipherSuite, PrivateKeyBundle, PublicKeyBundle};
use crate::error::{CryptoError, CryptoResult};
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rsa::RsaPrivateKey;
use x25519_dalek::{PublicKey, StaticSecret};

/// RSA modulus size for the legacy suite (public exponent 65537).
pub const RSA_KEY_BITS: usize = 2048;

/// Generates a fresh key pair for the given suite.
///
/// The X25519 suite produces an encryption pair plus a companion Ed25519
/// signing pair; the legacy suite produces a single RSA-2048 pair. All key
/// material comes from the OS CSPRNG; an unavailable RNG aborts the
/// process rather than degrading to weak randomness.
pub fn generate_keypair(suite: CipherSuite) -> CryptoResult<(PublicKeyBundle, PrivateKeyBundle)> {
    match suite {
        CipherSuite::X25519ChaCha20Poly1305 => Ok(generate_x25519()),
        CipherSuite::RsaOaepSha256 => generate_rsa(),
    }
}

fn generate_x25519() -> (PublicKeyBundle, PrivateKeyBundle) {
    let encryption = StaticSecret::random_from_rng(OsRng);
    let signing = SigningKey::generate(&mut OsRng);

    let public = PublicKeyBundle::X25519 {
        encryption: PublicKey::from(&encryption).to_bytes(),
        verifying: signing.verifying_key().to_bytes(),
    };
    let private = PrivateKeyBundle::X25519 {
        encryption: encryption.to_bytes(),
        signing: signing.to_bytes(),
    };
    (public, private)
}

fn generate_rsa() -> CryptoResult<(PublicKeyBundle, PrivateKeyBundle)> {
    let mut rng = OsRng;
    let private_key = RsaPrivateKey::new(&mut rng, RSA_KEY_BITS)
        .map_err(|e| CryptoError::KeyGeneration(format!("RSA-{RSA_KEY_BITS}: {e}")))?;

    let private_key_der = private_key
        .to_pkcs8_der()
        .map_err(|e| CryptoError::KeyGeneration(format!("PKCS#8 encode: {e}")))?
        .as_bytes()
        .to_vec();
    let public_key_der = private_key
        .to_public_key()
        .to_public_key_der()
        .map_err(|e| CryptoError::KeyGeneration(format!("SPKI encode: {e}")))?
        .as_bytes()
        .to_vec();

    Ok((
        PublicKeyBundle::Rsa { public_key_der },
        PrivateKeyBundle::Rsa { private_key_der },
    ))
}
