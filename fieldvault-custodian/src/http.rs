//! HTTP surface of the custodian.
//!
//! Three routes plus liveness, all behind the origin gate:
//!
//! - `POST /issue-key` (`?rotate=true` selects force-rotation)
//! - `POST /decrypt`
//! - `DELETE /key/{identity}`
//! - `GET /health`

use crate::error::CustodianError;
use crate::origin::OriginPolicy;
use crate::service::{CustodianService, IssueMode};
use axum::extract::{ConnectInfo, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct CustodianState {
    pub service: Arc<CustodianService>,
    pub origin_policy: Arc<dyn OriginPolicy>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssueKeyRequest {
    pub identity: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssueKeyResponse {
    pub public_bundle: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IssueKeyParams {
    #[serde(default)]
    pub rotate: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecryptRequest {
    pub credential: String,
    /// Base64-encoded sealed blob. Note there is no identity field: the
    /// key is selected by the credential's verified subject alone.
    pub ciphertext: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecryptResponse {
    pub plaintext: String,
}

/// Builds the custodian router with the origin gate applied to every route.
pub fn router(state: CustodianState) -> Router {
    Router::new()
        .route("/issue-key", post(issue_key_handler))
        .route("/decrypt", post(decrypt_handler))
        .route("/key/:identity", delete(delete_key_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(state.clone(), origin_gate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Error)]
pub enum HttpServerError {
    #[error("an error occurred running the HTTP server: {0}")]
    ServingFailed(#[from] std::io::Error),
}

/// Runs the custodian server until ctrl-c.
pub async fn serve(listen_addr: SocketAddr, state: CustodianState) -> Result<(), HttpServerError> {
    let suite = state.service.suite();
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = %listen_addr, %suite, "custodian listening");

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    Ok(())
}

/// Transport gate: the peer address is checked before any handler runs.
/// A non-listed origin gets a 403 and the request body (credential
/// included) is never parsed.
async fn origin_gate(
    State(state): State<CustodianState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !state.origin_policy.is_allowed(peer.ip()) {
        tracing::warn!(origin = %peer.ip(), "rejected connection from non-allowlisted origin");
        return CustodianError::OriginDenied.into_response();
    }
    next.run(request).await
}

async fn issue_key_handler(
    State(state): State<CustodianState>,
    Query(params): Query<IssueKeyParams>,
    Json(req): Json<IssueKeyRequest>,
) -> Result<Json<IssueKeyResponse>, CustodianError> {
    let mode = if params.rotate {
        IssueMode::ForceRotate
    } else {
        IssueMode::CreateIfAbsent
    };
    let public_bundle = state.service.issue(&req.identity, mode)?;
    Ok(Json(IssueKeyResponse { public_bundle }))
}

async fn decrypt_handler(
    State(state): State<CustodianState>,
    Json(req): Json<DecryptRequest>,
) -> Result<Json<DecryptResponse>, CustodianError> {
    let plaintext = state
        .service
        .decrypt_on_behalf(&req.credential, &req.ciphertext)?;
    Ok(Json(DecryptResponse { plaintext }))
}

async fn delete_key_handler(
    State(state): State<CustodianState>,
    Path(identity): Path<String>,
) -> Result<StatusCode, CustodianError> {
    state.service.delete(&identity)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
