use async_trait::async_trait;
use chrono::{DateTime, Utc};
use community_shared::types::TrendingEntry;

use super::rows::TrendingRow;
use crate::{RepositoryError, TrendingRepository};

/// Name of the `seed_markers` row claimed by the first trending seed.
pub const TRENDING_SEED_MARKER: &str = "trending_topics";

/// PostgreSQL implementation of the trending repository.
pub struct PostgresTrendingRepository {
    pool: sqlx::PgPool,
}

impl PostgresTrendingRepository {
    /// Creates a new PostgreSQL trending repository instance.
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }

    /// Inserts entries within an active transaction. Titles that already exist are skipped.
    async fn insert_entries_tx(
        &self,
        entries: &[TrendingEntry],
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), RepositoryError> {
        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO trending_topics (title, score, last_updated)
                VALUES ($1, $2, $3)
                ON CONFLICT (title) DO NOTHING
                "#,
            )
            .bind(&entry.title)
            .bind(entry.score)
            .bind(entry.last_updated)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TrendingRepository for PostgresTrendingRepository {
    async fn record_engagement(&self, title: &str, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO trending_topics (title, score, last_updated)
            VALUES ($1, 1, $2)
            ON CONFLICT (title)
            DO UPDATE SET
                score = trending_topics.score + 1,
                last_updated = EXCLUDED.last_updated
            "#,
        )
        .bind(title)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn top_entries(&self, limit: i64) -> Result<Vec<TrendingEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, TrendingRow>(
            r#"
            SELECT title, score, last_updated
            FROM trending_topics
            ORDER BY score DESC, last_updated DESC, title
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(TrendingEntry::from).collect())
    }

    /// Claims the seed marker and inserts the entries in one transaction.
    ///
    /// A concurrent seeder blocks on the marker's primary key until the first
    /// transaction commits, then inserts nothing and reports `false`.
    async fn seed_entries(&self, entries: &[TrendingEntry]) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            "INSERT INTO seed_markers (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        )
        .bind(TRENDING_SEED_MARKER)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            == 1;

        if !claimed {
            tx.rollback().await?;
            return Ok(false);
        }

        self.insert_entries_tx(entries, &mut tx).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn replace_entries(&self, entries: &[TrendingEntry]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM trending_topics")
            .execute(&mut *tx)
            .await?;
        self.insert_entries_tx(entries, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }
}
