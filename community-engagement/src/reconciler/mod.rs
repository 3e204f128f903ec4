//! The counter reconciler applies vote intents against the ledger and returns
//! the authoritative like count.
use std::sync::Arc;

use community_repository::PostsRepository;
use community_shared::types::{TargetKind, VoteDirection, VoteIntent};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::EngagementError;
use crate::ledger::VoteLedger;
use crate::trending::TrendingAggregator;

/// Applies like and unlike intents and keeps the trending list informed.
#[derive(Clone)]
pub struct CounterReconciler {
    posts: Arc<dyn PostsRepository>,
    ledger: VoteLedger,
    trending: TrendingAggregator,
}

impl CounterReconciler {
    /// Creates a new `CounterReconciler`.
    ///
    /// # Arguments
    ///
    /// * `posts` - Repository holding the engagement targets
    /// * `trending` - Aggregator notified on forum likes
    pub fn new(posts: Arc<dyn PostsRepository>, trending: TrendingAggregator) -> Self {
        Self {
            ledger: VoteLedger::new(posts.clone()),
            posts,
            trending,
        }
    }

    /// The ledger used by this reconciler.
    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    /// Applies one vote and returns the authoritative like count.
    ///
    /// A `Like` requires the voter to be absent from the target's voters and an
    /// `Unlike` requires it to be present. A rejected call leaves the target
    /// unchanged and reports the current count.
    ///
    /// A successful `Like` on a forum post also records engagement for the post
    /// title. That update is best effort: its failure is logged and the vote
    /// still succeeds.
    ///
    /// # Errors
    ///
    /// * `EngagementError::NotFound` - No such target
    /// * `EngagementError::InvalidTransition` - "already liked" or "not yet liked"
    /// * `EngagementError::Storage` - The store failed
    pub async fn apply_vote(
        &self,
        target_id: Uuid,
        voter_id: &str,
        direction: VoteDirection,
    ) -> Result<i64, EngagementError> {
        let target = self
            .posts
            .find_target(target_id)
            .await?
            .ok_or_else(|| EngagementError::not_found(format!("target {target_id} does not exist")))?;

        let like_count = match direction {
            VoteDirection::Like => self.ledger.record_vote(target_id, voter_id).await?,
            VoteDirection::Unlike => self.ledger.revoke_vote(target_id, voter_id).await?,
        };

        info!(
            target_id = %target_id,
            direction = ?direction,
            like_count,
            "Vote applied"
        );

        if direction == VoteDirection::Like && target.kind == TargetKind::Forum {
            if let Err(e) = self.trending.record_engagement(&target.title).await {
                warn!(
                    target_id = %target_id,
                    error = %e,
                    "Failed to record trending engagement"
                );
            }
        }

        Ok(like_count)
    }

    /// Applies a validated `VoteIntent`.
    pub async fn apply_intent(&self, intent: &VoteIntent) -> Result<i64, EngagementError> {
        self.apply_vote(intent.target_id, &intent.voter_id, intent.direction)
            .await
    }
}
