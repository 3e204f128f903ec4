mod comment;
mod notification;
mod post;
mod target;
mod trending;
mod vote;

pub use comment::{Comment, NewComment};
pub use notification::CommentNotification;
pub use post::{Author, NewPost, Post};
pub use target::{EngagementTarget, TargetKind};
pub use trending::{EngagementSnapshot, TrendingEntry};
pub use vote::{VoteDirection, VoteIntent, VoteOutcome};
