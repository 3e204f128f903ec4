//! # Community Engagement
//! This crate holds the engagement core of the community service.
//! It includes the vote ledger, the counter reconciler that applies like and
//! unlike intents, the trending aggregator, and the post and comment services,
//! along with error handling and input validation.
pub mod comments;
pub mod errors;
pub mod ledger;
pub mod posts;
pub mod reconciler;
pub mod trending;
pub mod validation;

pub use comments::CommentService;
pub use errors::{EngagementError, LedgerError};
pub use ledger::VoteLedger;
pub use posts::PostService;
pub use reconciler::CounterReconciler;
pub use trending::TrendingAggregator;
