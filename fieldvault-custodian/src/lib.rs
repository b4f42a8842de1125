//! FieldVault key custodian.
//!
//! The custodian is the sole holder of private key material. It lives on a
//! restricted network segment and exposes exactly three operations to the
//! application tier: issue a key pair for an identity (returning only the
//! public half), decrypt a sealed field on behalf of an authenticated
//! caller, and delete an identity's key record.
//!
//! Two gates guard every request:
//!
//! 1. **Origin gate**: the peer address must pass the injected
//!    [`origin::OriginPolicy`] before any handler runs; non-listed origins
//!    get a 403 with no further processing (no credential is even parsed).
//! 2. **Identity binding**: the identity whose key is used for decryption
//!    is resolved exclusively from the verified bearer credential. The
//!    request body carries no identity field, so a caller can never select
//!    another identity's key by naming it.
//!
//! Private key bundles never leave the process: they are not serialized
//! into responses, log lines, or debug output.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod origin;
pub mod service;
pub mod store;

pub use auth::{issue_credential, Claims, CredentialVerifier, JwtVerifier};
pub use config::CustodianConfig;
pub use error::{CustodianError, CustodianResult};
pub use http::{router, serve, CustodianState};
pub use origin::{OriginPolicy, StaticAllowlist};
pub use service::{CustodianService, IssueMode};
pub use store::{KeyRecord, KeyStore, StoreError, StoreResult};
