//! The trending aggregator.
//!
//! Forum likes bump the score of an entry keyed by the post title. When the
//! store holds no entries, they are synthesized once from the most engaged
//! forum posts, guarded by the repository's persisted seed marker.
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use community_repository::{PostsRepository, TrendingRepository};
use community_shared::types::{EngagementSnapshot, TargetKind, TrendingEntry};
use tracing::{debug, info};

use crate::errors::EngagementError;

/// Number of titles returned by `top_topics` when the caller has no preference.
pub const DEFAULT_TOPIC_LIMIT: i64 = 5;

/// Number of posts read when synthesizing trending entries.
pub const BOOTSTRAP_POST_LIMIT: i64 = 20;

/// The kind of post whose engagement feeds the trending list.
pub const TRENDING_KIND: TargetKind = TargetKind::Forum;

/// Derives a ranked topic list from post engagement.
#[derive(Clone)]
pub struct TrendingAggregator {
    posts: Arc<dyn PostsRepository>,
    trending: Arc<dyn TrendingRepository>,
}

impl TrendingAggregator {
    pub fn new(posts: Arc<dyn PostsRepository>, trending: Arc<dyn TrendingRepository>) -> Self {
        Self { posts, trending }
    }

    /// Increments the score of the entry for `title`, creating it with score 1.
    pub async fn record_engagement(&self, title: &str) -> Result<(), EngagementError> {
        self.trending.record_engagement(title, Utc::now()).await?;
        debug!(title = %title, "Recorded trending engagement");
        Ok(())
    }

    /// Returns up to `limit` titles ordered by score, then recency.
    ///
    /// An empty store is seeded first, through the same guard as `seed`.
    pub async fn top_topics(&self, limit: i64) -> Result<Vec<String>, EngagementError> {
        if limit <= 0 {
            return Err(EngagementError::validation("limit must be positive"));
        }

        let mut entries = self.trending.top_entries(limit).await?;
        if entries.is_empty() {
            self.seed().await?;
            entries = self.trending.top_entries(limit).await?;
        }
        Ok(entries.into_iter().map(|entry| entry.title).collect())
    }

    /// Seeds the store from the current post ranking unless it was seeded before.
    ///
    /// The seed marker is only claimed when there is at least one post to seed
    /// from, so an empty deployment seeds on the first query after content arrives.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - This call seeded the store
    /// * `Ok(false)` - The store was already seeded, or there was nothing to seed from
    pub async fn seed(&self) -> Result<bool, EngagementError> {
        let snapshots = self
            .posts
            .top_by_engagement(TRENDING_KIND, BOOTSTRAP_POST_LIMIT)
            .await?;
        if snapshots.is_empty() {
            debug!("No posts to seed trending entries from");
            return Ok(false);
        }

        let entries = synthesize_entries(&snapshots, Utc::now());
        let seeded = self.trending.seed_entries(&entries).await?;
        if seeded {
            info!(entries = entries.len(), "Seeded trending entries");
        }
        Ok(seeded)
    }

    /// Rebuilds every entry from the current post ranking.
    ///
    /// # Returns
    ///
    /// The number of entries written.
    pub async fn recompute(&self) -> Result<usize, EngagementError> {
        let snapshots = self
            .posts
            .top_by_engagement(TRENDING_KIND, BOOTSTRAP_POST_LIMIT)
            .await?;
        let entries = synthesize_entries(&snapshots, Utc::now());
        self.trending.replace_entries(&entries).await?;
        info!(entries = entries.len(), "Recomputed trending entries");
        Ok(entries.len())
    }
}

/// One entry per distinct title, scored `likes + comments`.
///
/// Snapshots arrive ranked, so when two posts share a title the higher ranked
/// one wins.
fn synthesize_entries(snapshots: &[EngagementSnapshot], now: DateTime<Utc>) -> Vec<TrendingEntry> {
    let mut seen = HashSet::new();
    snapshots
        .iter()
        .filter(|snapshot| seen.insert(snapshot.title.as_str()))
        .map(|snapshot| TrendingEntry {
            title: snapshot.title.clone(),
            score: snapshot.score(),
            last_updated: now,
        })
        .collect()
}
