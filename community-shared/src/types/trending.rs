use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A ranked engagement score keyed by post title.
///
/// Entries are ordered by `score` descending, then `last_updated` descending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrendingEntry {
    pub title: String,
    pub score: i64,
    pub last_updated: DateTime<Utc>,
}

/// Engagement totals of one post, used to synthesize trending entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementSnapshot {
    pub title: String,
    pub like_count: i64,
    pub comment_count: i64,
}

impl EngagementSnapshot {
    /// The trending score a post contributes when entries are synthesized.
    pub fn score(&self) -> i64 {
        self.like_count + self.comment_count
    }
}
