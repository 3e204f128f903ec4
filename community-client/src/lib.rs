//! Client-side engagement for the community service.
//!
//! This crate provides:
//! - [`TargetSync`] the optimistic like-toggle state machine for one target
//! - [`VoteCache`] the per-session record of liked targets, persisted as JSON
//! - [`VoteTransport`] trait for sending vote intents, with [`HttpVoteTransport`]
//!   as the production implementation
//! - [`EngagementClient`] which ties the three together
//!
//! ## Usage
//!
//! ```ignore
//! use community_client::{EngagementClient, HttpVoteTransport, VoteCache};
//! use std::sync::Arc;
//!
//! let cache = VoteCache::load("session/likes.json").await?;
//! let transport = Arc::new(HttpVoteTransport::new("http://localhost:8080"));
//! let client = EngagementClient::new("voter-1", transport, cache);
//!
//! client.track(post_id, 5).await;
//! let state = client.toggle(post_id).await?;
//! ```
mod cache;
mod client;
mod errors;
mod sync;
mod transport;

pub use cache::VoteCache;
pub use client::EngagementClient;
pub use errors::{CacheError, ClientError, TransportError};
pub use sync::{PendingToggle, SyncState, TargetSync};
pub use transport::{HttpVoteTransport, VoteRequest, VoteTransport};
