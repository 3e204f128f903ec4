//! Error types for the vote ledger.
use community_repository::RepositoryError;
use thiserror::Error;
use uuid::Uuid;

/// Represents errors that can occur while changing ledger membership.
///
/// The membership errors carry the count read in the same atomic step that
/// rejected the change.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Voter already recorded (like count {like_count})")]
    AlreadyVoted { like_count: i64 },

    #[error("Voter not recorded (like count {like_count})")]
    NotVoted { like_count: i64 },

    #[error("Target not found: {0}")]
    TargetNotFound(Uuid),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
