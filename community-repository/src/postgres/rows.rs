//! Row types shared by the PostgreSQL repositories and their conversions into
//! domain types.
use chrono::{DateTime, Utc};
use community_shared::types::{
    Author, Comment, CommentNotification, EngagementSnapshot, EngagementTarget, Post,
    TrendingEntry,
};
use uuid::Uuid;

use crate::RepositoryError;

pub(crate) const POST_COLUMNS: &str = "id, kind, title, preview, category, body, author_name, \
     author_avatar, like_count, comment_count, created_at";

pub(crate) const COMMENT_COLUMNS: &str =
    "id, target_id, parent_id, text, author_name, author_avatar, created_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PostRow {
    id: Uuid,
    kind: String,
    title: String,
    preview: String,
    category: String,
    body: Option<String>,
    author_name: String,
    author_avatar: Option<String>,
    like_count: i64,
    comment_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = RepositoryError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: row.id,
            kind: row.kind.parse().map_err(RepositoryError::InvalidKind)?,
            title: row.title,
            preview: row.preview,
            category: row.category,
            body: row.body,
            author: Author {
                name: row.author_name,
                avatar: row.author_avatar,
            },
            like_count: row.like_count,
            comment_count: row.comment_count,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TargetRow {
    id: Uuid,
    kind: String,
    title: String,
    like_count: i64,
    voters: Vec<String>,
}

impl TryFrom<TargetRow> for EngagementTarget {
    type Error = RepositoryError;

    fn try_from(row: TargetRow) -> Result<Self, Self::Error> {
        Ok(EngagementTarget {
            id: row.id,
            kind: row.kind.parse().map_err(RepositoryError::InvalidKind)?,
            title: row.title,
            like_count: row.like_count,
            voters: row.voters,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CommentRow {
    id: Uuid,
    target_id: Uuid,
    parent_id: Option<Uuid>,
    text: String,
    author_name: String,
    author_avatar: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            target_id: row.target_id,
            parent_id: row.parent_id,
            text: row.text,
            author: Author {
                name: row.author_name,
                avatar: row.author_avatar,
            },
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct NotificationRow {
    id: Uuid,
    target_id: Uuid,
    title: String,
    comment_body: String,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for CommentNotification {
    fn from(row: NotificationRow) -> Self {
        CommentNotification {
            id: row.id,
            target_id: row.target_id,
            title: row.title,
            comment_body: row.comment_body,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SnapshotRow {
    title: String,
    like_count: i64,
    comment_count: i64,
}

impl From<SnapshotRow> for EngagementSnapshot {
    fn from(row: SnapshotRow) -> Self {
        EngagementSnapshot {
            title: row.title,
            like_count: row.like_count,
            comment_count: row.comment_count,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TrendingRow {
    title: String,
    score: i64,
    last_updated: DateTime<Utc>,
}

impl From<TrendingRow> for TrendingEntry {
    fn from(row: TrendingRow) -> Self {
        TrendingEntry {
            title: row.title,
            score: row.score,
            last_updated: row.last_updated,
        }
    }
}
