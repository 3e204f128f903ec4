use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Author;

/// A comment on a post. Replies point at their parent through `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub target_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub text: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

/// A validated comment waiting to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub parent_id: Option<Uuid>,
    pub text: String,
    pub author: Author,
}
