//! Error types for the community repository.
//! Defines specific errors that can occur during data store operations.
use thiserror::Error;

/// Represents errors that can occur within the community repositories.
///
/// This enum consolidates various error conditions specific to database interactions,
/// such as SQLx errors during queries and rows that no longer map onto domain types.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid target kind: {0}")]
    InvalidKind(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
