use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TargetKind;

/// The author block attached to posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A blog article or forum post as returned to callers.
///
/// The voter set of the embedded engagement target is never exposed,
/// only its `like_count`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub kind: TargetKind,
    pub title: String,
    pub preview: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub author: Author,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// The fields needed to create a post. The engagement target starts empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub kind: TargetKind,
    pub title: String,
    pub preview: String,
    pub category: String,
    pub body: Option<String>,
    pub author: Author,
}
