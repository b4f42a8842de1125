//! Typed key bundles and the cipher-suite selector.
//!
//! A bundle carries an identity's long-term key material as a tagged
//! structure, serialized once with serde and base64-wrapped for transport.
//! The X25519 variant pairs an encryption key with a companion Ed25519
//! signing key; the legacy variant carries a single RSA key as DER.

use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Deployment-wide cipher suite. Injected into the codec and the custodian
/// service at construction; the two suites are mutually exclusive per
/// deployment and a blob carries no algorithm tag of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CipherSuite {
    /// X25519 key agreement + ChaCha20-Poly1305 AEAD.
    #[default]
    X25519ChaCha20Poly1305,
    /// RSA-2048 with OAEP-SHA256 padding.
    RsaOaepSha256,
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherSuite::X25519ChaCha20Poly1305 => f.write_str("x25519-chacha20-poly1305"),
            CipherSuite::RsaOaepSha256 => f.write_str("rsa-oaep-sha256"),
        }
    }
}

impl FromStr for CipherSuite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x25519" | "x25519-chacha20-poly1305" => Ok(CipherSuite::X25519ChaCha20Poly1305),
            "rsa" | "rsa-oaep-sha256" => Ok(CipherSuite::RsaOaepSha256),
            other => Err(format!("unknown cipher suite: {other}")),
        }
    }
}

/// Public half of an identity's key material.
///
/// Copied into every record sealed for that identity; safe to hand to the
/// application side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "alg")]
pub enum PublicKeyBundle {
    /// X25519 encryption key + Ed25519 verifying key, raw 32-byte each.
    #[serde(rename = "x25519")]
    X25519 {
        encryption: [u8; 32],
        verifying: [u8; 32],
    },
    /// RSA public key, SPKI DER.
    #[serde(rename = "rsa")]
    Rsa { public_key_der: Vec<u8> },
}

impl PublicKeyBundle {
    /// Suite this bundle belongs to.
    pub fn suite(&self) -> CipherSuite {
        match self {
            PublicKeyBundle::X25519 { .. } => CipherSuite::X25519ChaCha20Poly1305,
            PublicKeyBundle::Rsa { .. } => CipherSuite::RsaOaepSha256,
        }
    }

    /// Serializes to the base64 transport encoding.
    pub fn to_base64(&self) -> CryptoResult<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| CryptoError::MalformedKey(format!("serialize public bundle: {e}")))?;
        Ok(BASE64.encode(json))
    }

    /// Parses the base64 transport encoding into a typed bundle.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let json = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::MalformedKey(format!("base64 decode: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| CryptoError::MalformedKey(format!("parse public bundle: {e}")))
    }
}

/// Private half of an identity's key material. Custodian-only.
///
/// Zeroized on drop. The `Debug` impl never prints key bytes, so a bundle
/// cannot leak through a log line or error chain.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(tag = "alg")]
pub enum PrivateKeyBundle {
    /// X25519 decryption key + Ed25519 signing key, raw 32-byte each.
    #[serde(rename = "x25519")]
    X25519 {
        encryption: [u8; 32],
        signing: [u8; 32],
    },
    /// RSA private key, PKCS#8 DER.
    #[serde(rename = "rsa")]
    Rsa { private_key_der: Vec<u8> },
}

impl PrivateKeyBundle {
    /// Suite this bundle belongs to.
    pub fn suite(&self) -> CipherSuite {
        match self {
            PrivateKeyBundle::X25519 { .. } => CipherSuite::X25519ChaCha20Poly1305,
            PrivateKeyBundle::Rsa { .. } => CipherSuite::RsaOaepSha256,
        }
    }

    /// Serializes to the base64 transport encoding.
    pub fn to_base64(&self) -> CryptoResult<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| CryptoError::MalformedKey(format!("serialize private bundle: {e}")))?;
        Ok(BASE64.encode(json))
    }

    /// Parses the base64 transport encoding into a typed bundle.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let json = BASE64
            .decode(encoded)
            .map_err(|e| CryptoError::MalformedKey(format!("base64 decode: {e}")))?;
        serde_json::from_slice(&json)
            .map_err(|e| CryptoError::MalformedKey(format!("parse private bundle: {e}")))
    }
}

impl fmt::Debug for PrivateKeyBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKeyBundle::X25519 { .. } => f.write_str("PrivateKeyBundle::X25519(<redacted>)"),
            PrivateKeyBundle::Rsa { .. } => f.write_str("PrivateKeyBundle::Rsa(<redacted>)"),
        }
    }
}
