//! Blog and forum posts. A new post carries an empty engagement target.
use std::sync::Arc;

use community_repository::PostsRepository;
use community_shared::types::{Author, NewPost, Post, TargetKind};
use tracing::info;
use uuid::Uuid;

use crate::errors::EngagementError;
use crate::validation::require_non_blank;

/// Page size used when listing posts.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostsRepository>) -> Self {
        Self { posts }
    }

    /// Validates and stores a new post.
    ///
    /// `title`, `preview`, `category` and `author.name` must be non-blank. Text
    /// fields are trimmed, and a blank body or avatar is treated as absent.
    pub async fn create_post(&self, post: NewPost) -> Result<Post, EngagementError> {
        let post = NewPost {
            kind: post.kind,
            title: require_non_blank("title", &post.title)?,
            preview: require_non_blank("preview", &post.preview)?,
            category: require_non_blank("category", &post.category)?,
            body: non_blank(post.body),
            author: Author {
                name: require_non_blank("author.name", &post.author.name)?,
                avatar: non_blank(post.author.avatar),
            },
        };

        let created = self.posts.create_post(&post).await?;
        info!(post_id = %created.id, kind = %created.kind, "Post created");
        Ok(created)
    }

    /// Lists posts of one kind, newest first.
    pub async fn list_posts(&self, kind: TargetKind) -> Result<Vec<Post>, EngagementError> {
        Ok(self.posts.list_posts(kind, DEFAULT_LIST_LIMIT).await?)
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, EngagementError> {
        self.posts
            .find_post(id)
            .await?
            .ok_or_else(|| EngagementError::not_found(format!("target {id} does not exist")))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use community_repository::InMemoryStore;

    fn new_post(kind: TargetKind, title: &str) -> NewPost {
        NewPost {
            kind,
            title: title.to_string(),
            preview: "preview".to_string(),
            category: "housing".to_string(),
            body: Some("  ".to_string()),
            author: Author {
                name: " Ana ".to_string(),
                avatar: None,
            },
        }
    }

    #[tokio::test]
    async fn test_create_post_starts_with_empty_target() {
        let store = Arc::new(InMemoryStore::new());
        let service = PostService::new(store.clone());

        let post = service
            .create_post(new_post(TargetKind::Forum, "  Rent caps  "))
            .await
            .unwrap();
        assert_eq!(post.title, "Rent caps");
        assert_eq!(post.author.name, "Ana");
        assert_eq!(post.body, None);
        assert_eq!(post.like_count, 0);

        let target = store.find_target(post.id).await.unwrap().unwrap();
        assert!(target.voters.is_empty());
    }

    #[tokio::test]
    async fn test_create_post_requires_title() {
        let service = PostService::new(Arc::new(InMemoryStore::new()));
        let result = service.create_post(new_post(TargetKind::Blog, " ")).await;
        assert!(matches!(result, Err(EngagementError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_posts_filters_by_kind() {
        let service = PostService::new(Arc::new(InMemoryStore::new()));
        service.create_post(new_post(TargetKind::Blog, "Blog")).await.unwrap();
        service.create_post(new_post(TargetKind::Forum, "Forum")).await.unwrap();

        let blogs = service.list_posts(TargetKind::Blog).await.unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].title, "Blog");
    }

    #[tokio::test]
    async fn test_get_post_not_found() {
        let service = PostService::new(Arc::new(InMemoryStore::new()));
        assert!(matches!(
            service.get_post(Uuid::new_v4()).await,
            Err(EngagementError::NotFound(_))
        ));
    }
}
