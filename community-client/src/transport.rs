//! Delivery of vote intents to the server.
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TransportError;

/// Body of `PATCH /targets/{id}`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub increment: i64,
    pub voter_id: String,
}

/// Trait for sending vote intents.
///
/// Production code uses [`HttpVoteTransport`]; tests substitute their own.
#[async_trait]
pub trait VoteTransport: Send + Sync {
    /// Sends one vote intent.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(count))` - Accepted, with the authoritative like count
    /// * `Ok(None)` - Accepted, but the response carried no count
    /// * `Err(_)` - Network failure or rejection
    async fn send_vote(
        &self,
        target_id: Uuid,
        request: &VoteRequest,
    ) -> Result<Option<i64>, TransportError>;
}

/// Sends vote intents to the community API over HTTP.
pub struct HttpVoteTransport {
    base_url: String,
    client: ReqwestClient,
}

impl HttpVoteTransport {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, ReqwestClient::new())
    }

    pub fn with_client(base_url: &str, client: ReqwestClient) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn target_url(&self, target_id: Uuid) -> String {
        format!("{}/targets/{}", self.base_url, target_id)
    }
}

#[async_trait]
impl VoteTransport for HttpVoteTransport {
    async fn send_vote(
        &self,
        target_id: Uuid,
        request: &VoteRequest,
    ) -> Result<Option<i64>, TransportError> {
        let response = self
            .client
            .patch(self.target_url(target_id))
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            decode_accepted(&body)
        } else {
            Err(decode_rejected(status.as_u16(), &body))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteResponse {
    like_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    message: Option<String>,
    error: Option<String>,
    like_count: Option<i64>,
}

fn decode_accepted(body: &[u8]) -> Result<Option<i64>, TransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<VoteResponse>(body)
        .map(|response| response.like_count)
        .map_err(|e| TransportError::InvalidResponse(e.to_string()))
}

fn decode_rejected(status: u16, body: &[u8]) -> TransportError {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(response) => TransportError::Rejected {
            status,
            message: response
                .message
                .or(response.error)
                .unwrap_or_else(|| "request failed".to_string()),
            like_count: response.like_count,
        },
        Err(_) => TransportError::Rejected {
            status,
            message: String::from_utf8_lossy(body).into_owned(),
            like_count: None,
        },
    }
}
