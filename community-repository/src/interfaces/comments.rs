//! This module defines the `CommentsRepository` trait for threaded comments and
//! the notifications recorded alongside them.
use community_shared::types::{Comment, CommentNotification, NewComment};
use uuid::Uuid;

use crate::errors::RepositoryError;

/// The result of storing a comment.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentInsert {
    /// The comment, the comment count bump and the notification were persisted.
    Created(Comment),
    /// No target with the requested id exists.
    TargetMissing,
    /// `parent_id` does not reference a comment on the same target.
    ParentMissing,
}

/// A trait that defines the interface for comments and comment notifications.
#[async_trait::async_trait]
pub trait CommentsRepository: Send + Sync {
    /// Stores a comment, increments the owning post's comment count and records a
    /// notification, all in one transaction.
    async fn add_comment(
        &self,
        target_id: Uuid,
        comment: &NewComment,
    ) -> Result<CommentInsert, RepositoryError>;

    /// Lists the comments of a target, oldest first, or `None` if the target does not exist.
    async fn list_comments(&self, target_id: Uuid) -> Result<Option<Vec<Comment>>, RepositoryError>;

    /// Lists comment notifications, newest first.
    async fn list_notifications(&self, limit: i64) -> Result<Vec<CommentNotification>, RepositoryError>;
}
