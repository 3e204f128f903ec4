//! This module defines the `PostsRepository` trait, which provides an interface
//! for posts and the engagement targets embedded in them.
use community_shared::types::{
    EngagementSnapshot, EngagementTarget, NewPost, Post, TargetKind, VoteOutcome,
};
use uuid::Uuid;

use crate::errors::RepositoryError;

/// A trait that defines the interface for posts and their embedded vote ledger.
///
/// The two ledger mutations, `add_voter` and `remove_voter`, must check membership
/// and change it together with the like count in one atomic step. Implementations
/// never read the voter set and write it back in separate calls.
#[async_trait::async_trait]
pub trait PostsRepository: Send + Sync {
    /// Persists a new post with an empty engagement target.
    async fn create_post(&self, post: &NewPost) -> Result<Post, RepositoryError>;

    /// Returns the post with the given id, if any.
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, RepositoryError>;

    /// Lists posts of one kind, newest first.
    async fn list_posts(&self, kind: TargetKind, limit: i64) -> Result<Vec<Post>, RepositoryError>;

    /// Returns the engagement target embedded in the post with the given id.
    async fn find_target(&self, id: Uuid) -> Result<Option<EngagementTarget>, RepositoryError>;

    /// Returns whether `voter_id` is in the target's voter set, or `None` if the
    /// target does not exist.
    async fn has_voter(&self, id: Uuid, voter_id: &str) -> Result<Option<bool>, RepositoryError>;

    /// Adds `voter_id` to the voter set and increments the like count, only if the
    /// voter is not already present.
    ///
    /// # Returns
    ///
    /// * `VoteOutcome::Applied(count)` - The voter was added
    /// * `VoteOutcome::Unchanged(count)` - The voter was already present
    /// * `VoteOutcome::TargetMissing` - No such target
    async fn add_voter(&self, id: Uuid, voter_id: &str) -> Result<VoteOutcome, RepositoryError>;

    /// Removes `voter_id` from the voter set and decrements the like count, only if
    /// the voter is present. The count never drops below zero.
    async fn remove_voter(&self, id: Uuid, voter_id: &str) -> Result<VoteOutcome, RepositoryError>;

    /// Returns up to `limit` posts of one kind ranked by likes, then comment count.
    async fn top_by_engagement(
        &self,
        kind: TargetKind,
        limit: i64,
    ) -> Result<Vec<EngagementSnapshot>, RepositoryError>;
}
