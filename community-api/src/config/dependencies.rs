//! Dependency initialization and wiring for the community API.

use std::sync::Arc;
use std::time::Duration;

use community_repository::{
    run_migrations, PostgresCommentsRepository, PostgresPostsRepository,
    PostgresTrendingRepository,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::time::sleep;
use tracing::{info, warn};

use super::{ConnectionMode, Settings};
use crate::server::state::AppState;
use crate::StartupError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Shared state handed to the router.
    pub state: AppState,
    pub pool: PgPool,
}

impl Dependencies {
    /// Connects to PostgreSQL, applies migrations and builds the services.
    ///
    /// Also seeds the trending entries, which is a no-op once the store has
    /// been seeded.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(StartupError)` - If initialization fails (connection failures only in fail-fast mode)
    pub async fn new(settings: &Settings) -> Result<Self, StartupError> {
        info!(
            max_connections = settings.max_connections,
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            session_guard = settings.session_secret.is_some(),
            "Initializing dependencies"
        );

        let pool = Self::connect_to_postgres(
            &settings.database_url,
            settings.max_connections,
            settings.connection_mode,
            settings.retry_interval,
        )
        .await?;
        info!("PostgreSQL connection established");

        run_migrations(&pool).await?;
        info!("Database migrations applied");

        let posts = Arc::new(PostgresPostsRepository::new(pool.clone()).await?);
        let comments = Arc::new(PostgresCommentsRepository::new(pool.clone()).await?);
        let trending = Arc::new(PostgresTrendingRepository::new(pool.clone()).await?);

        let mut state = AppState::new(posts, comments, trending);
        if let Some(secret) = &settings.session_secret {
            state = state.with_session_secret(secret);
        }

        if state.trending.seed().await? {
            info!("Trending entries seeded");
        }

        Ok(Self { state, pool })
    }

    /// Connect to PostgreSQL with retry logic based on connection mode.
    async fn connect_to_postgres(
        url: &str,
        max_connections: u32,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<PgPool, StartupError> {
        loop {
            match PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(url)
                .await
            {
                Ok(pool) => return Ok(pool),
                Err(e) => match mode {
                    ConnectionMode::FailFast => return Err(e.into()),
                    ConnectionMode::Retry => {
                        warn!(
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to PostgreSQL, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fail_fast_returns_database_error() {
        let result = Dependencies::connect_to_postgres(
            "invalid-database-url",
            1,
            ConnectionMode::FailFast,
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(StartupError::Database(_))));
    }
}
