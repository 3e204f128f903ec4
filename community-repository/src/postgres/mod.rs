//! PostgreSQL implementation of the community repositories.
//!
//! Provides a PostgreSQL backend for the `PostsRepository`, `CommentsRepository`
//! and `TrendingRepository` traits on top of a shared `sqlx::PgPool`.
//!
//! ## Key Features
//!
//! - Vote ledger mutations as single conditional `UPDATE ... RETURNING` statements
//! - Comment inserts wrapped in a transaction with the comment count bump and notification
//! - Trending upserts with `ON CONFLICT (title) DO UPDATE`
//! - Seeding guarded by a row in `seed_markers`, claimed with `ON CONFLICT DO NOTHING`
//!
//! ## Database Tables
//!
//! - `posts`: blog and forum posts with the embedded `like_count` and `voters`
//! - `comments`: threaded comments per post
//! - `comment_notifications`: one row per stored comment
//! - `trending_topics`: trending entries keyed by title
//! - `seed_markers`: one-time initialisation markers
mod comments_repository;
mod posts_repository;
mod rows;
mod trending_repository;

pub use comments_repository::PostgresCommentsRepository;
pub use posts_repository::PostgresPostsRepository;
pub use trending_repository::PostgresTrendingRepository;

use crate::RepositoryError;

/// Applies the embedded migrations in `community-repository/migrations`.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
