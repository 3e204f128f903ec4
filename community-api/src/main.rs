//! Community API entry point.
//!
//! Serves posts, likes, comments and trending topics for the rental community.

use std::env;

use community_api::{server, Dependencies, Settings, StartupError};
use community_engagement::TrendingAggregator;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("community_api=info,community_engagement=info,tower_http=info")
    });

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "community-api",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "community-api",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

/// Periodically rebuilds trending entries from the current post ranking.
fn spawn_trending_recompute(trending: TrendingAggregator, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately; startup already seeded.
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(e) = trending.recompute().await {
                warn!(error = %e, "Trending recomputation failed");
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting community API");

    let settings = Settings::from_env().inspect_err(|e| {
        error!(error = %e, "Invalid configuration");
    })?;

    let deps = match Dependencies::new(&settings).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    if let Some(every) = settings.trending_recompute_interval {
        info!(interval_secs = every.as_secs(), "Scheduling trending recomputation");
        spawn_trending_recompute(deps.state.trending.clone(), every);
    }

    let app = server::create_app(deps.state, settings.cors_layer()?);
    let result = server::run_server(app, settings.addr()).await;

    deps.pool.close().await;
    if let Err(e) = &result {
        error!(error = %e, "Community API failed");
    }
    result
}
