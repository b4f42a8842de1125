//! Application-side library for FieldVault.
//!
//! The application tier never holds private key material. At identity
//! creation it asks the custodian for a key pair and keeps only the public
//! bundle; at write time it seals each sensitive field locally with
//! [`FieldEncryptor`]; at read time it forwards the sealed blob and the
//! caller's bearer credential to the custodian via [`CustodianClient`]
//! and receives plaintext over the private network link.
//!
//! A failed seal is an error, never a plaintext fallback; the caller
//! must abort the write.

mod api_client;
mod encryptor;
mod error;

pub use api_client::CustodianClient;
pub use encryptor::FieldEncryptor;
pub use error::{ClientError, ClientResult};
