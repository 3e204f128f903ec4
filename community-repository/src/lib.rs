//! # Community Repository
//! This crate provides traits and implementations for interacting with the
//! community data store. It includes definitions for errors, interfaces,
//! a PostgreSQL implementation and an in-memory implementation used by tests
//! and local runs.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{CommentInsert, CommentsRepository, PostsRepository, TrendingRepository};
pub use memory::InMemoryStore;
pub use postgres::{
    run_migrations, PostgresCommentsRepository, PostgresPostsRepository,
    PostgresTrendingRepository,
};
