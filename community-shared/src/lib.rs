//! # Community Shared
//! This crate defines the data structures shared across the community workspace.
//! It includes posts and their embedded engagement targets, vote intents, comments,
//! comment notifications and trending entries.
pub mod types;
