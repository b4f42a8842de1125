//! HTTP-level tests: origin gate, endpoint statuses, and oracle
//! indistinguishability of rejection responses.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Duration;
use fieldvault_crypto::{CipherSuite, EnvelopeCodec, PublicKeyBundle};
use fieldvault_custodian::{
    issue_credential, router, CredentialVerifier, CustodianResult, CustodianService,
    CustodianState, JwtVerifier, KeyStore, StaticAllowlist,
};
use http_body_util::BodyExt;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "test-secret";
const ALLOWED: &str = "10.1.0.2";
const BLOCKED: &str = "192.0.2.77";

/// Wraps the real verifier and counts invocations, so tests can prove the
/// origin gate rejects before any credential parsing happens.
struct CountingVerifier {
    calls: Arc<AtomicUsize>,
    inner: JwtVerifier,
}

impl CredentialVerifier for CountingVerifier {
    fn verify(&self, credential: &str) -> CustodianResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(credential)
    }
}

fn test_state(calls: Arc<AtomicUsize>) -> CustodianState {
    let verifier = Arc::new(CountingVerifier {
        calls,
        inner: JwtVerifier::new(SECRET),
    });
    CustodianState {
        service: Arc::new(CustodianService::new(
            KeyStore::open_in_memory().unwrap(),
            CipherSuite::X25519ChaCha20Poly1305,
            verifier,
        )),
        origin_policy: Arc::new(StaticAllowlist::new([ALLOWED.parse::<IpAddr>().unwrap()])),
    }
}

fn json_request(method: &str, uri: &str, body: serde_json::Value, peer: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::new(peer.parse().unwrap(), 40000)));
    request
}

fn empty_request(method: &str, uri: &str, peer: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::new(peer.parse().unwrap(), 40000)));
    request
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn issue_key(app: &axum::Router, identity: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/issue-key",
            serde_json::json!({ "identity": identity }),
            ALLOWED,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["public_bundle"]
        .as_str()
        .unwrap()
        .to_string()
}

fn seal_field(public_bundle_b64: &str, plaintext: &str) -> String {
    let bundle = PublicKeyBundle::from_base64(public_bundle_b64).unwrap();
    let codec = EnvelopeCodec::new(CipherSuite::X25519ChaCha20Poly1305);
    BASE64.encode(codec.seal(&bundle, plaintext.as_bytes()).unwrap())
}

#[tokio::test]
async fn blocked_origin_gets_403_without_credential_parsing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router(test_state(calls.clone()));

    let credential = issue_credential("alice@test.com", SECRET, Duration::minutes(5)).unwrap();
    let response = app
        .oneshot(json_request(
            "POST",
            "/decrypt",
            serde_json::json!({ "credential": credential, "ciphertext": "AAAA" }),
            BLOCKED,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "origin not allowed");
    // The credential was never even looked at.
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blocked_origin_cannot_issue_keys() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router(test_state(calls));

    let response = app
        .oneshot(json_request(
            "POST",
            "/issue-key",
            serde_json::json!({ "identity": "alice@test.com" }),
            BLOCKED,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn issue_then_decrypt_roundtrip() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router(test_state(calls));

    let public = issue_key(&app, "alice@test.com").await;
    let sealed = seal_field(&public, "1234567890");
    let credential = issue_credential("alice@test.com", SECRET, Duration::minutes(5)).unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/decrypt",
            serde_json::json!({ "credential": credential, "ciphertext": sealed }),
            ALLOWED,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["plaintext"], "1234567890");
}

#[tokio::test]
async fn rejection_responses_are_indistinguishable() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router(test_state(calls));

    let alice_public = issue_key(&app, "alice@test.com").await;
    issue_key(&app, "bob@test.com").await;
    let sealed = seal_field(&alice_public, "1234567890");

    // Case 1: bob presents his own valid credential with alice's blob.
    let bob = issue_credential("bob@test.com", SECRET, Duration::minutes(5)).unwrap();
    let cross_identity = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/decrypt",
            serde_json::json!({ "credential": bob, "ciphertext": sealed }),
            ALLOWED,
        ))
        .await
        .unwrap();

    // Case 2: outright invalid credential.
    let bad_credential = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/decrypt",
            serde_json::json!({ "credential": "garbage", "ciphertext": sealed }),
            ALLOWED,
        ))
        .await
        .unwrap();

    // Same status, same body: no oracle between "bad credential" and
    // "authentication failure".
    assert_eq!(cross_identity.status(), StatusCode::BAD_REQUEST);
    assert_eq!(bad_credential.status(), StatusCode::BAD_REQUEST);
    let a = body_json(cross_identity).await;
    let b = body_json(bad_credential).await;
    assert_eq!(a, b);
    assert_eq!(a["error"], "decryption failed");
}

#[tokio::test]
async fn unknown_identity_is_404() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router(test_state(calls));

    let alice_public = issue_key(&app, "alice@test.com").await;
    let sealed = seal_field(&alice_public, "1234567890");
    let carol = issue_credential("carol@test.com", SECRET, Duration::minutes(5)).unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/decrypt",
            serde_json::json!({ "credential": carol, "ciphertext": sealed }),
            ALLOWED,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_idempotent_over_http() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router(test_state(calls));

    issue_key(&app, "alice@test.com").await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", "/key/alice@test.com", ALLOWED))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
async fn reissue_is_stable_until_rotated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router(test_state(calls));

    let first = issue_key(&app, "alice@test.com").await;
    let second = issue_key(&app, "alice@test.com").await;
    assert_eq!(first, second);

    let response = app
        .oneshot(json_request(
            "POST",
            "/issue-key?rotate=true",
            serde_json::json!({ "identity": "alice@test.com" }),
            ALLOWED,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rotated = body_json(response).await["public_bundle"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(first, rotated);
}

#[tokio::test]
async fn health_is_behind_the_origin_gate() {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = router(test_state(calls));

    let ok = app
        .clone()
        .oneshot(empty_request("GET", "/health", ALLOWED))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let denied = app
        .oneshot(empty_request("GET", "/health", BLOCKED))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}
