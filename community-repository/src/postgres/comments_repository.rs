use async_trait::async_trait;
use chrono::Utc;
use community_shared::types::{Comment, CommentNotification, NewComment};
use uuid::Uuid;

use super::rows::{CommentRow, NotificationRow, COMMENT_COLUMNS};
use crate::{CommentInsert, CommentsRepository, RepositoryError};

/// PostgreSQL implementation of the comments repository.
pub struct PostgresCommentsRepository {
    pool: sqlx::PgPool,
}

impl PostgresCommentsRepository {
    /// Creates a new PostgreSQL comments repository instance.
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }
}

#[async_trait]
impl CommentsRepository for PostgresCommentsRepository {
    /// Stores a comment inside a transaction.
    ///
    /// The post row is locked with `FOR UPDATE` first so the comment count bump
    /// and the notification refer to a post that cannot disappear mid-transaction.
    async fn add_comment(
        &self,
        target_id: Uuid,
        comment: &NewComment,
    ) -> Result<CommentInsert, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(target_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Ok(CommentInsert::TargetMissing);
        }

        if let Some(parent_id) = comment.parent_id {
            let parent_found = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM comments WHERE id = $1 AND target_id = $2)",
            )
            .bind(parent_id)
            .bind(target_id)
            .fetch_one(&mut *tx)
            .await?;
            if !parent_found {
                tx.rollback().await?;
                return Ok(CommentInsert::ParentMissing);
            }
        }

        let sql = format!(
            "INSERT INTO comments (id, target_id, parent_id, text, author_name, author_avatar, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COMMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(target_id)
            .bind(comment.parent_id)
            .bind(&comment.text)
            .bind(&comment.author.name)
            .bind(&comment.author.avatar)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO comment_notifications (id, target_id, comment_body, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(target_id)
        .bind(&comment.text)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(CommentInsert::Created(Comment::from(row)))
    }

    async fn list_comments(&self, target_id: Uuid) -> Result<Option<Vec<Comment>>, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(target_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Ok(None);
        }

        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE target_id = $1 ORDER BY created_at ASC, id"
        );
        let rows = sqlx::query_as::<_, CommentRow>(&sql)
            .bind(target_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(Some(rows.into_iter().map(Comment::from).collect()))
    }

    async fn list_notifications(&self, limit: i64) -> Result<Vec<CommentNotification>, RepositoryError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT n.id, n.target_id, p.title, n.comment_body, n.created_at
            FROM comment_notifications n
            JOIN posts p ON p.id = n.target_id
            ORDER BY n.created_at DESC, n.id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CommentNotification::from).collect())
    }
}
