use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("vote rejected with status {status}: {message}")]
    Rejected {
        status: u16,
        message: String,
        like_count: Option<i64>,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Whether the server refused the vote because the voter already had the
    /// requested membership ("already liked" or "not yet liked").
    ///
    /// Only these rejections carry the authoritative like count.
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            TransportError::Rejected {
                status: 400,
                like_count: Some(_),
                ..
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors surfaced to the caller of `EngagementClient`.
///
/// Any error from `toggle` means the target was rolled back to its state from
/// before the toggle. A rejected transition also corrects the session's vote
/// cache, so tracking the target again with `server_like_count` resyncs it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("target {0} is not tracked")]
    UnknownTarget(Uuid),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl ClientError {
    /// The authoritative like count reported by the server with a rejection.
    pub fn server_like_count(&self) -> Option<i64> {
        match self {
            ClientError::Transport(TransportError::Rejected { like_count, .. }) => *like_count,
            _ => None,
        }
    }
}
