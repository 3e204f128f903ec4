//! The vote ledger: the per-target set of voters that have liked it.
//!
//! Membership changes are delegated to the repository's conditional updates,
//! so the presence check and the mutation form one atomic step.
use std::sync::Arc;

use community_repository::PostsRepository;
use community_shared::types::VoteOutcome;
use uuid::Uuid;

use crate::errors::LedgerError;

/// Enforces at most one like per voter per target.
#[derive(Clone)]
pub struct VoteLedger {
    posts: Arc<dyn PostsRepository>,
}

impl VoteLedger {
    pub fn new(posts: Arc<dyn PostsRepository>) -> Self {
        Self { posts }
    }

    /// Returns whether `voter_id` has liked the target.
    pub async fn has_voted(&self, target_id: Uuid, voter_id: &str) -> Result<bool, LedgerError> {
        self.posts
            .has_voter(target_id, voter_id)
            .await?
            .ok_or(LedgerError::TargetNotFound(target_id))
    }

    /// Adds `voter_id` to the target's voters and returns the new like count.
    ///
    /// # Errors
    ///
    /// * `LedgerError::AlreadyVoted` - The voter was already present; nothing changed
    /// * `LedgerError::TargetNotFound` - No such target
    pub async fn record_vote(&self, target_id: Uuid, voter_id: &str) -> Result<i64, LedgerError> {
        match self.posts.add_voter(target_id, voter_id).await? {
            VoteOutcome::Applied(like_count) => Ok(like_count),
            VoteOutcome::Unchanged(like_count) => Err(LedgerError::AlreadyVoted { like_count }),
            VoteOutcome::TargetMissing => Err(LedgerError::TargetNotFound(target_id)),
        }
    }

    /// Removes `voter_id` from the target's voters and returns the new like count.
    ///
    /// # Errors
    ///
    /// * `LedgerError::NotVoted` - The voter was absent; nothing changed
    /// * `LedgerError::TargetNotFound` - No such target
    pub async fn revoke_vote(&self, target_id: Uuid, voter_id: &str) -> Result<i64, LedgerError> {
        match self.posts.remove_voter(target_id, voter_id).await? {
            VoteOutcome::Applied(like_count) => Ok(like_count),
            VoteOutcome::Unchanged(like_count) => Err(LedgerError::NotVoted { like_count }),
            VoteOutcome::TargetMissing => Err(LedgerError::TargetNotFound(target_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use community_repository::InMemoryStore;
    use community_shared::types::{Author, Post, TargetKind};

    async fn ledger_with_post() -> (VoteLedger, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let id = Uuid::new_v4();
        store
            .insert_post(
                Post {
                    id,
                    kind: TargetKind::Blog,
                    title: "Finding a flatmate".to_string(),
                    preview: "Tips".to_string(),
                    category: "guides".to_string(),
                    body: None,
                    author: Author {
                        name: "Ana".to_string(),
                        avatar: None,
                    },
                    like_count: 0,
                    comment_count: 0,
                    created_at: Utc::now(),
                },
                vec![],
            )
            .await;
        (VoteLedger::new(store), id)
    }

    #[tokio::test]
    async fn test_record_then_revoke() {
        let (ledger, id) = ledger_with_post().await;

        assert!(!ledger.has_voted(id, "u1").await.unwrap());
        assert_eq!(ledger.record_vote(id, "u1").await.unwrap(), 1);
        assert!(ledger.has_voted(id, "u1").await.unwrap());

        assert!(matches!(
            ledger.record_vote(id, "u1").await,
            Err(LedgerError::AlreadyVoted { like_count: 1 })
        ));

        assert_eq!(ledger.revoke_vote(id, "u1").await.unwrap(), 0);
        assert!(matches!(
            ledger.revoke_vote(id, "u1").await,
            Err(LedgerError::NotVoted { like_count: 0 })
        ));
    }

    #[tokio::test]
    async fn test_unknown_target() {
        let (ledger, _) = ledger_with_post().await;
        let missing = Uuid::new_v4();

        assert!(matches!(
            ledger.has_voted(missing, "u1").await,
            Err(LedgerError::TargetNotFound(id)) if id == missing
        ));
        assert!(matches!(
            ledger.record_vote(missing, "u1").await,
            Err(LedgerError::TargetNotFound(_))
        ));
    }
}
