//! # Community API
//! HTTP surface of the rental community service.
//! It wires the engagement services onto PostgreSQL from environment
//! configuration and exposes them through an axum router with CORS, request
//! tracing and an optional session-cookie guard.
pub mod config;
pub mod errors;
pub mod server;

pub use config::{ConnectionMode, Dependencies, Settings};
pub use errors::{ApiError, StartupError};
