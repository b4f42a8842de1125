use clap::Parser;
use fieldvault_crypto::CipherSuite;
use fieldvault_custodian::{
    CustodianConfig, CustodianService, CustodianState, JwtVerifier, KeyStore, StaticAllowlist,
};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// FieldVault key custodian service.
///
/// Runs on a restricted network segment and is the sole holder of private
/// key material for the application tier.
#[derive(Debug, Parser)]
#[command(name = "fieldvault-custodian")]
struct Args {
    /// Address to listen on (private network interface).
    #[arg(long, env = "FIELDVAULT_LISTEN", default_value = "127.0.0.1:8001")]
    listen: SocketAddr,

    /// DuckDB database file holding key records.
    #[arg(long, env = "FIELDVAULT_DB", default_value = "fieldvault-keys.db")]
    database: PathBuf,

    /// Cipher suite: "x25519" (default) or "rsa" (legacy).
    #[arg(long, env = "FIELDVAULT_SUITE", default_value = "x25519", value_parser = CipherSuite::from_str)]
    suite: CipherSuite,

    /// Shared secret for verifying bearer credentials (HS256).
    #[arg(long, env = "FIELDVAULT_TOKEN_SECRET")]
    token_secret: String,

    /// Origin addresses allowed through the network gate (comma-separated).
    #[arg(
        long = "allow",
        env = "FIELDVAULT_ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "127.0.0.1"
    )]
    allowed_origins: Vec<IpAddr>,
}

impl Args {
    fn into_config(self) -> CustodianConfig {
        CustodianConfig {
            listen_addr: self.listen,
            database_path: self.database,
            cipher_suite: self.suite,
            token_secret: self.token_secret,
            allowed_origins: self.allowed_origins,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();

    let store = KeyStore::open(&config.database_path)?;
    let verifier = Arc::new(JwtVerifier::new(&config.token_secret));
    let service = Arc::new(CustodianService::new(
        store,
        config.cipher_suite,
        verifier,
    ));
    let origin_policy = Arc::new(StaticAllowlist::new(config.allowed_origins));

    let state = CustodianState {
        service,
        origin_policy,
    };
    fieldvault_custodian::serve(config.listen_addr, state).await?;

    Ok(())
}
