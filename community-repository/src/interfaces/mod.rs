//! This module defines and re-exports the interfaces for the community repositories.
//! It serves as a central point for accessing traits related to data interaction.
mod comments;
mod posts;
mod trending;

pub use comments::{CommentInsert, CommentsRepository};
pub use posts::PostsRepository;
pub use trending::TrendingRepository;
