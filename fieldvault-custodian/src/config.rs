//! Custodian configuration.

use fieldvault_crypto::CipherSuite;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Configuration for the custodian service.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustodianConfig {
    /// Address to listen on. Must be a private-network interface; the
    /// origin allowlist is a second gate, not the only one.
    pub listen_addr: SocketAddr,

    /// DuckDB database file holding key records.
    pub database_path: PathBuf,

    /// Deployment-wide cipher suite.
    pub cipher_suite: CipherSuite,

    /// Shared secret for verifying bearer credentials (HS256).
    pub token_secret: String,

    /// Peer addresses allowed through the origin gate.
    pub allowed_origins: Vec<IpAddr>,
}

impl Default for CustodianConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8001),
            database_path: PathBuf::from("fieldvault-keys.db"),
            cipher_suite: CipherSuite::default(),
            token_secret: String::new(),
            allowed_origins: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
        }
    }
}
