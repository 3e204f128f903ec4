use community_engagement::EngagementError;
use community_repository::RepositoryError;
use thiserror::Error;

/// Errors that stop the service from starting or keep it from serving.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Engagement error: {0}")]
    Engagement(#[from] EngagementError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

impl StartupError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
