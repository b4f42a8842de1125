//! HTTP client for the custodian service.
//!
//! The application tier reaches the custodian only over the private
//! network link; this client carries the three operations the custodian
//! exposes. Non-success responses map to a typed error carrying the
//! custodian's (deliberately generic) message.

use crate::error::{ClientError, ClientResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct IssueKeyRequest<'a> {
    identity: &'a str,
}

#[derive(Deserialize)]
struct IssueKeyResponse {
    public_bundle: String,
}

#[derive(Serialize)]
struct DecryptRequest<'a> {
    credential: &'a str,
    ciphertext: &'a str,
}

#[derive(Deserialize)]
struct DecryptResponse {
    plaintext: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for the custodian's key-management API.
pub struct CustodianClient {
    client: Client,
    base_url: String,
}

impl CustodianClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Requests a key pair for an identity, returning the public bundle.
    /// Safe to repeat: an existing identity gets its existing bundle back.
    pub async fn issue_key(&self, identity: &str) -> ClientResult<String> {
        self.issue(identity, false).await
    }

    /// Explicit rotation. Every field sealed under the identity's previous
    /// key becomes permanently undecryptable.
    pub async fn rotate_key(&self, identity: &str) -> ClientResult<String> {
        self.issue(identity, true).await
    }

    async fn issue(&self, identity: &str, rotate: bool) -> ClientResult<String> {
        let mut url = format!("{}/issue-key", self.base_url);
        if rotate {
            url.push_str("?rotate=true");
        }
        let response = self
            .client
            .post(url)
            .json(&IssueKeyRequest { identity })
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: IssueKeyResponse = response.json().await?;
        debug!(%identity, rotate, "issued key pair");
        Ok(body.public_bundle)
    }

    /// Asks the custodian to decrypt a sealed field on behalf of the
    /// credential's subject.
    pub async fn decrypt(&self, credential: &str, ciphertext: &str) -> ClientResult<String> {
        let response = self
            .client
            .post(format!("{}/decrypt", self.base_url))
            .json(&DecryptRequest {
                credential,
                ciphertext,
            })
            .send()
            .await?;
        let response = check_status(response).await?;
        let body: DecryptResponse = response.json().await?;
        Ok(body.plaintext)
    }

    /// Deletes an identity's key record. Idempotent.
    pub async fn delete_key(&self, identity: &str) -> ClientResult<()> {
        let response = self
            .client
            .delete(format!("{}/key/{identity}", self.base_url))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Maps a non-success response to [`ClientError::Api`] with the
/// custodian's error message, falling back to the status text when the
/// body is not the expected shape.
async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
