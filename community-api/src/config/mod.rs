//! Configuration read from the environment, and the wiring built from it.
mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::StartupError;

/// Default bind address.
const DEFAULT_SERVER_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default HTTP port.
const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default size of the PostgreSQL pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is not set.
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

/// Connection mode for PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry the connection at a fixed interval until it succeeds.
    Retry,
}

impl FromStr for ConnectionMode {
    type Err = StartupError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "fail-fast" | "failfast" | "fail_fast" => Ok(Self::FailFast),
            "retry" => Ok(Self::Retry),
            other => Err(StartupError::config(format!(
                "DATABASE_CONNECTION_MODE must be 'fail-fast' or 'retry', got: {other}"
            ))),
        }
    }
}

/// Service settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_connections: u32,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
    pub session_secret: Option<String>,
    pub cors_allowed_origins: Vec<String>,
    pub trending_recompute_interval: Option<Duration>,
}

impl Settings {
    /// Reads settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `SERVER_HOST`: Bind address (default: 0.0.0.0)
    /// - `SERVER_PORT`: Bind port (default: 8080)
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `DATABASE_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `DATABASE_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    /// - `SESSION_SECRET`: Enables the session-cookie guard on mutating routes
    /// - `CORS_ALLOWED_ORIGINS`: Comma-separated origins (default: localhost dev servers)
    /// - `TRENDING_RECOMPUTE_INTERVAL_SECS`: Enables periodic trending recomputation
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - All values present and well formed
    /// * `Err(StartupError::Config)` - A required value is missing or a value is malformed
    pub fn from_env() -> Result<Self, StartupError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| StartupError::config("DATABASE_URL must be set"))?;

        let host = parse_var("SERVER_HOST")?.unwrap_or(DEFAULT_SERVER_HOST);
        let port = parse_var("SERVER_PORT")?.unwrap_or(DEFAULT_SERVER_PORT);
        let max_connections =
            parse_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(DEFAULT_MAX_CONNECTIONS);
        let connection_mode =
            parse_var("DATABASE_CONNECTION_MODE")?.unwrap_or(ConnectionMode::Retry);
        let retry_interval = Duration::from_secs(
            parse_var("DATABASE_RETRY_INTERVAL_SECS")?.unwrap_or(DEFAULT_RETRY_INTERVAL_SECS),
        );

        let session_secret = env::var("SESSION_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty());

        let cors_allowed_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(origins) => origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let trending_recompute_interval = parse_var::<u64>("TRENDING_RECOMPUTE_INTERVAL_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            database_url,
            host,
            port,
            max_connections,
            connection_mode,
            retry_interval,
            session_secret,
            cors_allowed_origins,
            trending_recompute_interval,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Builds the CORS layer for the configured origins.
    pub fn cors_layer(&self) -> Result<CorsLayer, StartupError> {
        let origins = self
            .cors_allowed_origins
            .iter()
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| {
                    StartupError::config(format!("Invalid CORS origin: {origin}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true))
    }
}

/// Reads and parses an optional environment variable.
fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, StartupError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| StartupError::config(format!("{name} is malformed: {value}"))),
        _ => Ok(None),
    }
}
