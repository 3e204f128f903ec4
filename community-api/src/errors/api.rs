//! Conversion of service errors into HTTP responses.
//!
//! Request failures are logged here and nowhere else.
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use community_engagement::EngagementError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Engagement(#[from] EngagementError),

    /// The request body could not be read as the expected JSON document.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The session is valid but does not allow acting for the requested identity.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Engagement(EngagementError::Validation(_))
            | ApiError::Engagement(EngagementError::InvalidTransition { .. })
            | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Engagement(EngagementError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Engagement(EngagementError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Engagement(EngagementError::Validation(_)) => "validation_error",
            ApiError::Engagement(EngagementError::InvalidTransition { .. }) => "invalid_transition",
            ApiError::Engagement(EngagementError::NotFound(_)) => "not_found",
            ApiError::Engagement(EngagementError::Storage(_)) => "storage_error",
            ApiError::MalformedBody(_) => "malformed_body",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = match &self {
            ApiError::Engagement(EngagementError::InvalidTransition {
                message,
                like_count,
            }) => json!({
                "error": self.code(),
                "message": message,
                "likeCount": like_count,
            }),
            ApiError::Engagement(EngagementError::Validation(message))
            | ApiError::Engagement(EngagementError::NotFound(message))
            | ApiError::MalformedBody(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message) => json!({
                "error": self.code(),
                "message": message,
            }),
            ApiError::Engagement(EngagementError::Storage(_)) => json!({
                "error": self.code(),
                "message": "internal storage error",
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use community_repository::RepositoryError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::from(EngagementError::validation("bad id")), StatusCode::BAD_REQUEST),
            (
                ApiError::from(EngagementError::invalid_transition("already liked", 6)),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::from(EngagementError::not_found("gone")), StatusCode::NOT_FOUND),
            (
                ApiError::from(EngagementError::Storage(RepositoryError::Unavailable(
                    "down".to_string(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::unauthorized("no token"), StatusCode::UNAUTHORIZED),
            (ApiError::forbidden("not yours"), StatusCode::FORBIDDEN),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
