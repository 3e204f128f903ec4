use async_trait::async_trait;
use community_shared::types::{
    EngagementSnapshot, EngagementTarget, NewPost, Post, TargetKind, VoteOutcome,
};
use uuid::Uuid;

use super::rows::{PostRow, SnapshotRow, TargetRow, POST_COLUMNS};
use crate::{PostsRepository, RepositoryError};

/// PostgreSQL implementation of the posts repository.
///
/// The engagement target lives in the `like_count` and `voters` columns of the
/// post row. Ledger mutations are single conditional `UPDATE` statements, so the
/// membership check and the write happen under the same row lock.
pub struct PostgresPostsRepository {
    pool: sqlx::PgPool,
}

impl PostgresPostsRepository {
    /// Creates a new PostgreSQL posts repository instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the migrated schema
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }

    async fn current_like_count(&self, id: Uuid) -> Result<Option<i64>, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT like_count FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(count)
    }

    /// Turns the result of a conditional ledger update into a `VoteOutcome`.
    ///
    /// When the update matched no row, the target is looked up again to tell a
    /// missing target apart from a membership that already had the requested state.
    async fn resolve_outcome(
        &self,
        id: Uuid,
        updated: Option<i64>,
    ) -> Result<VoteOutcome, RepositoryError> {
        if let Some(count) = updated {
            return Ok(VoteOutcome::Applied(count));
        }
        Ok(match self.current_like_count(id).await? {
            Some(count) => VoteOutcome::Unchanged(count),
            None => VoteOutcome::TargetMissing,
        })
    }
}

#[async_trait]
impl PostsRepository for PostgresPostsRepository {
    async fn create_post(&self, post: &NewPost) -> Result<Post, RepositoryError> {
        let sql = format!(
            "INSERT INTO posts (id, kind, title, preview, category, body, author_name, author_avatar) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(post.kind.as_str())
            .bind(&post.title)
            .bind(&post.preview)
            .bind(&post.category)
            .bind(&post.body)
            .bind(&post.author.name)
            .bind(&post.author.avatar)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, RepositoryError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Post::try_from).transpose()
    }

    async fn list_posts(&self, kind: TargetKind, limit: i64) -> Result<Vec<Post>, RepositoryError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE kind = $1 ORDER BY created_at DESC, id LIMIT $2"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(kind.as_str())
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Post::try_from).collect()
    }

    async fn find_target(&self, id: Uuid) -> Result<Option<EngagementTarget>, RepositoryError> {
        let row = sqlx::query_as::<_, TargetRow>(
            "SELECT id, kind, title, like_count, voters FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(EngagementTarget::try_from).transpose()
    }

    async fn has_voter(&self, id: Uuid, voter_id: &str) -> Result<Option<bool>, RepositoryError> {
        let voted = sqlx::query_scalar::<_, bool>(
            "SELECT $2::text = ANY(voters) FROM posts WHERE id = $1",
        )
        .bind(id)
        .bind(voter_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(voted)
    }

    async fn add_voter(&self, id: Uuid, voter_id: &str) -> Result<VoteOutcome, RepositoryError> {
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts
            SET like_count = like_count + 1,
                voters = array_append(voters, $2::text)
            WHERE id = $1 AND NOT ($2::text = ANY(voters))
            RETURNING like_count
            "#,
        )
        .bind(id)
        .bind(voter_id)
        .fetch_optional(&self.pool)
        .await?;
        self.resolve_outcome(id, updated).await
    }

    async fn remove_voter(&self, id: Uuid, voter_id: &str) -> Result<VoteOutcome, RepositoryError> {
        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE posts
            SET like_count = GREATEST(like_count - 1, 0),
                voters = array_remove(voters, $2::text)
            WHERE id = $1 AND $2::text = ANY(voters)
            RETURNING like_count
            "#,
        )
        .bind(id)
        .bind(voter_id)
        .fetch_optional(&self.pool)
        .await?;
        self.resolve_outcome(id, updated).await
    }

    async fn top_by_engagement(
        &self,
        kind: TargetKind,
        limit: i64,
    ) -> Result<Vec<EngagementSnapshot>, RepositoryError> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT title, like_count, comment_count
            FROM posts
            WHERE kind = $1
            ORDER BY like_count DESC, comment_count DESC, created_at DESC
            LIMIT $2
            "#,
        )
        .bind(kind.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(EngagementSnapshot::from).collect())
    }
}
