//! Threaded comments and the notifications recorded for them.
use std::sync::Arc;

use community_repository::{CommentInsert, CommentsRepository};
use community_shared::types::{Author, Comment, CommentNotification, NewComment};
use tracing::info;
use uuid::Uuid;

use crate::errors::EngagementError;
use crate::validation::require_non_blank;

/// Avatar assigned to comment authors that did not provide one.
pub const DEFAULT_AVATAR_URL: &str = "/images/default-avatar.png";

/// Number of notifications returned by `notifications`.
pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentsRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentsRepository>) -> Self {
        Self { comments }
    }

    /// Validates and stores a comment on `target_id`.
    ///
    /// `text` and `author.name` must be non-blank and a missing avatar is
    /// replaced with `DEFAULT_AVATAR_URL`. The target's comment count and the
    /// notification are written together with the comment.
    ///
    /// # Errors
    ///
    /// * `EngagementError::Validation` - Blank fields, or `parent_id` is not a
    ///   comment on the same target
    /// * `EngagementError::NotFound` - No such target
    pub async fn add_comment(
        &self,
        target_id: Uuid,
        comment: NewComment,
    ) -> Result<Comment, EngagementError> {
        let comment = NewComment {
            parent_id: comment.parent_id,
            text: require_non_blank("text", &comment.text)?,
            author: Author {
                name: require_non_blank("author.name", &comment.author.name)?,
                avatar: Some(
                    comment
                        .author
                        .avatar
                        .map(|avatar| avatar.trim().to_string())
                        .filter(|avatar| !avatar.is_empty())
                        .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
                ),
            },
        };

        match self.comments.add_comment(target_id, &comment).await? {
            CommentInsert::Created(created) => {
                info!(
                    target_id = %target_id,
                    comment_id = %created.id,
                    reply = created.parent_id.is_some(),
                    "Comment added"
                );
                Ok(created)
            }
            CommentInsert::TargetMissing => Err(EngagementError::not_found(format!(
                "target {target_id} does not exist"
            ))),
            CommentInsert::ParentMissing => Err(EngagementError::validation(
                "parentId does not reference a comment on this target",
            )),
        }
    }

    /// Lists the comments of a target, oldest first.
    pub async fn list_comments(&self, target_id: Uuid) -> Result<Vec<Comment>, EngagementError> {
        self.comments
            .list_comments(target_id)
            .await?
            .ok_or_else(|| EngagementError::not_found(format!("target {target_id} does not exist")))
    }

    /// Lists the most recent comment notifications.
    pub async fn notifications(&self) -> Result<Vec<CommentNotification>, EngagementError> {
        Ok(self
            .comments
            .list_notifications(DEFAULT_NOTIFICATION_LIMIT)
            .await?)
    }
}
