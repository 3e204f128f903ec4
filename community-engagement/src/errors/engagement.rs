//! Error types for the engagement services.
//! Every service operation reports one of these, and the HTTP boundary maps
//! each variant onto a status code.
use community_repository::RepositoryError;
use thiserror::Error;

use super::LedgerError;

/// Errors returned by the engagement services.
#[derive(Debug, Error)]
pub enum EngagementError {
    /// Malformed input. Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The requested vote does not match the voter's current membership.
    #[error("Invalid transition: {message}")]
    InvalidTransition { message: String, like_count: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl EngagementError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_transition(message: impl Into<String>, like_count: i64) -> Self {
        Self::InvalidTransition {
            message: message.into(),
            like_count,
        }
    }
}

impl From<LedgerError> for EngagementError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::AlreadyVoted { like_count } => {
                EngagementError::invalid_transition("already liked", like_count)
            }
            LedgerError::NotVoted { like_count } => {
                EngagementError::invalid_transition("not yet liked", like_count)
            }
            LedgerError::TargetNotFound(id) => {
                EngagementError::not_found(format!("target {id} does not exist"))
            }
            LedgerError::Repository(e) => EngagementError::Storage(e),
        }
    }
}
