// App state for the axum server
use std::sync::Arc;

use community_engagement::{
    CommentService, CounterReconciler, PostService, TrendingAggregator,
};
use community_repository::{CommentsRepository, PostsRepository, TrendingRepository};

use super::session::SessionVerifier;

#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub reconciler: CounterReconciler,
    pub trending: TrendingAggregator,
    /// Present when mutating routes require a session cookie.
    pub session: Option<Arc<SessionVerifier>>,
}

impl AppState {
    /// Builds the engagement services on top of the given repositories.
    pub fn new(
        posts: Arc<dyn PostsRepository>,
        comments: Arc<dyn CommentsRepository>,
        trending: Arc<dyn TrendingRepository>,
    ) -> Self {
        let aggregator = TrendingAggregator::new(posts.clone(), trending);
        Self {
            posts: PostService::new(posts.clone()),
            comments: CommentService::new(comments),
            reconciler: CounterReconciler::new(posts, aggregator.clone()),
            trending: aggregator,
            session: None,
        }
    }

    /// Requires a session cookie signed with `secret` on mutating routes.
    pub fn with_session_secret(mut self, secret: &str) -> Self {
        self.session = Some(Arc::new(SessionVerifier::new(secret)));
        self
    }
}
