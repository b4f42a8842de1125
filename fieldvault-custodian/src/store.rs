//! Key custodian store: one DuckDB row per identity.
//!
//! The public bundle is returned to callers; the private bundle never
//! leaves the custodian process. Writes are single statements under the
//! connection mutex, so a record is committed all-or-nothing and a
//! concurrent read can never observe a half-written row.

use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the key record store. Kept separate from authentication
/// errors so a storage fault is never mistaken for a failed decryption.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A key record already exists for this identity; inserting again
    /// without an explicit replace would silently invalidate every field
    /// sealed under the old key.
    #[error("a key record already exists for {0}")]
    Duplicate(String),

    #[error("storage error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("corrupt key record: {0}")]
    Corrupt(String),
}

/// One identity's key material as persisted by the custodian.
#[derive(Clone)]
pub struct KeyRecord {
    pub identity: String,
    /// Base64 transport encoding of the public bundle.
    pub public_bundle: String,
    /// Base64 transport encoding of the private bundle. Custodian-only.
    pub private_bundle: String,
    pub created_at: DateTime<Utc>,
}

// Hand-written so the private bundle cannot leak through `{:?}` in a log
// line, panic message, or error chain.
impl fmt::Debug for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRecord")
            .field("identity", &self.identity)
            .field("public_bundle", &self.public_bundle)
            .field("private_bundle", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// DuckDB-backed store of per-identity key records.
#[derive(Clone)]
pub struct KeyStore {
    conn: Arc<Mutex<Connection>>,
}

impl KeyStore {
    /// Opens or creates the store at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Inserts a new key record. Rejects a duplicate identity with
    /// [`StoreError::Duplicate`]; re-issuance must go through
    /// [`KeyStore::replace`], which is an explicit data-loss operation.
    pub fn insert(
        &self,
        identity: &str,
        public_bundle: &str,
        private_bundle: &str,
    ) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        // The connection mutex serializes writers, so check-then-insert
        // cannot race with another insert for the same identity.
        let exists = record_exists(&conn, identity)?;
        if exists {
            return Err(StoreError::Duplicate(identity.to_string()));
        }
        conn.execute(
            "INSERT INTO key_records (identity, public_bundle, private_bundle, created_at)
             VALUES (?, ?, ?, ?)",
            params![
                identity,
                public_bundle,
                private_bundle,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Replaces any existing record for the identity. Every field sealed
    /// under the previous key becomes permanently undecryptable.
    pub fn replace(
        &self,
        identity: &str,
        public_bundle: &str,
        private_bundle: &str,
    ) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO key_records (identity, public_bundle, private_bundle, created_at)
             VALUES (?, ?, ?, ?)",
            params![
                identity,
                public_bundle,
                private_bundle,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Loads the record for an identity, if any.
    pub fn get(&self, identity: &str) -> StoreResult<Option<KeyRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT identity, public_bundle, private_bundle, created_at
             FROM key_records WHERE identity = ?",
        )?;
        let mut rows = stmt.query(params![identity])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let created_at: String = row.get(3)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| StoreError::Corrupt(format!("created_at for {identity}: {e}")))?
            .with_timezone(&Utc);

        Ok(Some(KeyRecord {
            identity: row.get(0)?,
            public_bundle: row.get(1)?,
            private_bundle: row.get(2)?,
            created_at,
        }))
    }

    /// Deletes the record for an identity. Idempotent: removing a
    /// non-existent identity is not an error.
    pub fn delete(&self, identity: &str) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM key_records WHERE identity = ?", params![identity])?;
        Ok(())
    }
}

fn record_exists(conn: &Connection, identity: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM key_records WHERE identity = ?")?;
    let mut rows = stmt.query(params![identity])?;
    Ok(rows.next()?.is_some())
}

fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS key_records (
            identity        TEXT PRIMARY KEY,
            public_bundle   TEXT NOT NULL,
            private_bundle  TEXT NOT NULL,
            created_at      TEXT NOT NULL
        );",
    )?;
    Ok(())
}
