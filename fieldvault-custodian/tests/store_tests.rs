use fieldvault_custodian::{KeyStore, StoreError};
use pretty_assertions::assert_eq;

#[test]
fn insert_get_roundtrip() {
    let store = KeyStore::open_in_memory().unwrap();
    store.insert("alice@test.com", "pub-a", "priv-a").unwrap();

    let record = store.get("alice@test.com").unwrap().unwrap();
    assert_eq!(record.identity, "alice@test.com");
    assert_eq!(record.public_bundle, "pub-a");
    assert_eq!(record.private_bundle, "priv-a");
}

#[test]
fn get_missing_returns_none() {
    let store = KeyStore::open_in_memory().unwrap();
    assert!(store.get("nobody@test.com").unwrap().is_none());
}

#[test]
fn duplicate_insert_rejected() {
    let store = KeyStore::open_in_memory().unwrap();
    store.insert("alice@test.com", "pub-a", "priv-a").unwrap();

    let err = store
        .insert("alice@test.com", "pub-b", "priv-b")
        .unwrap_err();
    assert!(matches!(err, StoreError::Duplicate(ref id) if id == "alice@test.com"));

    // The original record is untouched.
    let record = store.get("alice@test.com").unwrap().unwrap();
    assert_eq!(record.public_bundle, "pub-a");
}

#[test]
fn replace_overwrites() {
    let store = KeyStore::open_in_memory().unwrap();
    store.insert("alice@test.com", "pub-a", "priv-a").unwrap();
    store.replace("alice@test.com", "pub-b", "priv-b").unwrap();

    let record = store.get("alice@test.com").unwrap().unwrap();
    assert_eq!(record.public_bundle, "pub-b");
    assert_eq!(record.private_bundle, "priv-b");
}

#[test]
fn replace_works_without_existing_record() {
    let store = KeyStore::open_in_memory().unwrap();
    store.replace("alice@test.com", "pub-a", "priv-a").unwrap();
    assert!(store.get("alice@test.com").unwrap().is_some());
}

#[test]
fn delete_is_idempotent() {
    let store = KeyStore::open_in_memory().unwrap();
    store.insert("alice@test.com", "pub-a", "priv-a").unwrap();

    store.delete("alice@test.com").unwrap();
    assert!(store.get("alice@test.com").unwrap().is_none());

    // Deleting again (and deleting an identity that never existed) is
    // success with no side effect.
    store.delete("alice@test.com").unwrap();
    store.delete("ghost@test.com").unwrap();
}

#[test]
fn identities_are_isolated() {
    let store = KeyStore::open_in_memory().unwrap();
    store.insert("alice@test.com", "pub-a", "priv-a").unwrap();
    store.insert("bob@test.com", "pub-b", "priv-b").unwrap();

    store.delete("alice@test.com").unwrap();
    assert!(store.get("alice@test.com").unwrap().is_none());
    assert_eq!(
        store.get("bob@test.com").unwrap().unwrap().public_bundle,
        "pub-b"
    );
}

#[test]
fn debug_output_redacts_private_bundle() {
    let store = KeyStore::open_in_memory().unwrap();
    store
        .insert("alice@test.com", "pub-a", "priv-material-must-not-leak")
        .unwrap();

    let record = store.get("alice@test.com").unwrap().unwrap();
    let rendered = format!("{record:?}");
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("priv-material-must-not-leak"));
}

#[test]
fn survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.db");

    {
        let store = KeyStore::open(&path).unwrap();
        store.insert("alice@test.com", "pub-a", "priv-a").unwrap();
    }

    let store = KeyStore::open(&path).unwrap();
    let record = store.get("alice@test.com").unwrap().unwrap();
    assert_eq!(record.public_bundle, "pub-a");
}
