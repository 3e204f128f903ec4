use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recorded every time a comment is added to a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentNotification {
    pub id: Uuid,
    pub target_id: Uuid,
    pub title: String,
    pub comment_body: String,
    pub created_at: DateTime<Utc>,
}
