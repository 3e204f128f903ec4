//! Error types for the community API.
mod api;
mod startup;

pub use api::ApiError;
pub use startup::StartupError;
