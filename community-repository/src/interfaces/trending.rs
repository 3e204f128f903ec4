//! This module defines the `TrendingRepository` trait, which stores the trending
//! entries derived from post engagement.
use chrono::{DateTime, Utc};
use community_shared::types::TrendingEntry;

use crate::errors::RepositoryError;

/// A trait that defines the interface for the trending entry store.
///
/// Titles are unique. Both `seed_entries` and `replace_entries` write a whole set
/// of entries in one transaction.
#[async_trait::async_trait]
pub trait TrendingRepository: Send + Sync {
    /// Increments the score of the entry with this title and stamps it with `at`,
    /// creating the entry with score 1 if it does not exist.
    async fn record_engagement(&self, title: &str, at: DateTime<Utc>) -> Result<(), RepositoryError>;

    /// Returns up to `limit` entries ordered by score, then recency.
    async fn top_entries(&self, limit: i64) -> Result<Vec<TrendingEntry>, RepositoryError>;

    /// Inserts `entries` unless the persisted seed marker is already set.
    ///
    /// The marker is claimed in the same transaction as the inserts, so concurrent
    /// callers seed at most once. Entries whose title already exists are skipped.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - This call claimed the marker and inserted the entries
    /// * `Ok(false)` - The store had already been seeded
    async fn seed_entries(&self, entries: &[TrendingEntry]) -> Result<bool, RepositoryError>;

    /// Replaces every stored entry with `entries`.
    async fn replace_entries(&self, entries: &[TrendingEntry]) -> Result<(), RepositoryError>;
}
