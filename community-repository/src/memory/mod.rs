//! In-memory implementation of the community repositories.
//!
//! Backs local runs and tests. All state sits behind one `tokio::sync::Mutex`,
//! so each trait method observes and mutates the store atomically, the same
//! guarantee the PostgreSQL implementation gets from conditional updates and
//! transactions.
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use community_shared::types::{
    Comment, CommentNotification, EngagementSnapshot, EngagementTarget, NewComment, NewPost, Post,
    TargetKind, TrendingEntry, VoteOutcome,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    CommentInsert, CommentsRepository, PostsRepository, RepositoryError, TrendingRepository,
};

const TRENDING_SEED_MARKER: &str = "trending_topics";

#[derive(Debug, Clone)]
struct StoredPost {
    post: Post,
    voters: Vec<String>,
}

#[derive(Debug, Default)]
struct MemoryState {
    posts: Vec<StoredPost>,
    comments: Vec<Comment>,
    notifications: Vec<CommentNotification>,
    trending: HashMap<String, TrendingEntry>,
    seed_markers: HashSet<String>,
}

impl MemoryState {
    fn post_mut(&mut self, id: Uuid) -> Option<&mut StoredPost> {
        self.posts.iter_mut().find(|stored| stored.post.id == id)
    }

    fn post(&self, id: Uuid) -> Option<&StoredPost> {
        self.posts.iter().find(|stored| stored.post.id == id)
    }

    fn insert_entries(&mut self, entries: &[TrendingEntry]) {
        for entry in entries {
            self.trending
                .entry(entry.title.clone())
                .or_insert_with(|| entry.clone());
        }
    }
}

/// A process-local store implementing every repository trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed post together with its voter set.
    ///
    /// Used to load fixtures whose counters do not start at zero.
    pub async fn insert_post(&self, post: Post, voters: Vec<String>) {
        let mut state = self.state.lock().await;
        state.posts.retain(|stored| stored.post.id != post.id);
        state.posts.push(StoredPost { post, voters });
    }

    /// Makes every subsequent call fail with `RepositoryError::Unavailable`
    /// until it is switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store switched off".to_string(),
            ));
        }
        Ok(())
    }
}

fn newest_first(posts: &mut [&StoredPost]) {
    // Later inserts win ties, matching insertion order for equal timestamps.
    posts.reverse();
    posts.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
}

#[async_trait]
impl PostsRepository for InMemoryStore {
    async fn create_post(&self, post: &NewPost) -> Result<Post, RepositoryError> {
        self.check_available()?;
        let created = Post {
            id: Uuid::new_v4(),
            kind: post.kind,
            title: post.title.clone(),
            preview: post.preview.clone(),
            category: post.category.clone(),
            body: post.body.clone(),
            author: post.author.clone(),
            like_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        };
        let mut state = self.state.lock().await;
        state.posts.push(StoredPost {
            post: created.clone(),
            voters: Vec::new(),
        });
        Ok(created)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, RepositoryError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.post(id).map(|stored| stored.post.clone()))
    }

    async fn list_posts(&self, kind: TargetKind, limit: i64) -> Result<Vec<Post>, RepositoryError> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut posts: Vec<&StoredPost> = state
            .posts
            .iter()
            .filter(|stored| stored.post.kind == kind)
            .collect();
        newest_first(&mut posts);
        Ok(posts
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|stored| stored.post.clone())
            .collect())
    }

    async fn find_target(&self, id: Uuid) -> Result<Option<EngagementTarget>, RepositoryError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.post(id).map(|stored| EngagementTarget {
            id: stored.post.id,
            kind: stored.post.kind,
            title: stored.post.title.clone(),
            like_count: stored.post.like_count,
            voters: stored.voters.clone(),
        }))
    }

    async fn has_voter(&self, id: Uuid, voter_id: &str) -> Result<Option<bool>, RepositoryError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state
            .post(id)
            .map(|stored| stored.voters.iter().any(|voter| voter == voter_id)))
    }

    async fn add_voter(&self, id: Uuid, voter_id: &str) -> Result<VoteOutcome, RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let Some(stored) = state.post_mut(id) else {
            return Ok(VoteOutcome::TargetMissing);
        };
        if stored.voters.iter().any(|voter| voter == voter_id) {
            return Ok(VoteOutcome::Unchanged(stored.post.like_count));
        }
        stored.voters.push(voter_id.to_string());
        stored.post.like_count += 1;
        Ok(VoteOutcome::Applied(stored.post.like_count))
    }

    async fn remove_voter(&self, id: Uuid, voter_id: &str) -> Result<VoteOutcome, RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let Some(stored) = state.post_mut(id) else {
            return Ok(VoteOutcome::TargetMissing);
        };
        if !stored.voters.iter().any(|voter| voter == voter_id) {
            return Ok(VoteOutcome::Unchanged(stored.post.like_count));
        }
        stored.voters.retain(|voter| voter != voter_id);
        stored.post.like_count = (stored.post.like_count - 1).max(0);
        Ok(VoteOutcome::Applied(stored.post.like_count))
    }

    async fn top_by_engagement(
        &self,
        kind: TargetKind,
        limit: i64,
    ) -> Result<Vec<EngagementSnapshot>, RepositoryError> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut posts: Vec<&StoredPost> = state
            .posts
            .iter()
            .filter(|stored| stored.post.kind == kind)
            .collect();
        newest_first(&mut posts);
        posts.sort_by(|a, b| {
            b.post
                .like_count
                .cmp(&a.post.like_count)
                .then(b.post.comment_count.cmp(&a.post.comment_count))
        });
        Ok(posts
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|stored| EngagementSnapshot {
                title: stored.post.title.clone(),
                like_count: stored.post.like_count,
                comment_count: stored.post.comment_count,
            })
            .collect())
    }
}

#[async_trait]
impl CommentsRepository for InMemoryStore {
    async fn add_comment(
        &self,
        target_id: Uuid,
        comment: &NewComment,
    ) -> Result<CommentInsert, RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if state.post(target_id).is_none() {
            return Ok(CommentInsert::TargetMissing);
        }
        if let Some(parent_id) = comment.parent_id {
            let parent_found = state
                .comments
                .iter()
                .any(|existing| existing.id == parent_id && existing.target_id == target_id);
            if !parent_found {
                return Ok(CommentInsert::ParentMissing);
            }
        }

        let now = Utc::now();
        let created = Comment {
            id: Uuid::new_v4(),
            target_id,
            parent_id: comment.parent_id,
            text: comment.text.clone(),
            author: comment.author.clone(),
            created_at: now,
        };
        state.comments.push(created.clone());

        let title = match state.post_mut(target_id) {
            Some(stored) => {
                stored.post.comment_count += 1;
                stored.post.title.clone()
            }
            None => return Ok(CommentInsert::TargetMissing),
        };
        state.notifications.push(CommentNotification {
            id: Uuid::new_v4(),
            target_id,
            title,
            comment_body: comment.text.clone(),
            created_at: now,
        });

        Ok(CommentInsert::Created(created))
    }

    async fn list_comments(&self, target_id: Uuid) -> Result<Option<Vec<Comment>>, RepositoryError> {
        self.check_available()?;
        let state = self.state.lock().await;
        if state.post(target_id).is_none() {
            return Ok(None);
        }
        Ok(Some(
            state
                .comments
                .iter()
                .filter(|comment| comment.target_id == target_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_notifications(&self, limit: i64) -> Result<Vec<CommentNotification>, RepositoryError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TrendingRepository for InMemoryStore {
    async fn record_engagement(&self, title: &str, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        state
            .trending
            .entry(title.to_string())
            .and_modify(|entry| {
                entry.score += 1;
                entry.last_updated = at;
            })
            .or_insert_with(|| TrendingEntry {
                title: title.to_string(),
                score: 1,
                last_updated: at,
            });
        Ok(())
    }

    async fn top_entries(&self, limit: i64) -> Result<Vec<TrendingEntry>, RepositoryError> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut entries: Vec<TrendingEntry> = state.trending.values().cloned().collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.last_updated.cmp(&a.last_updated))
                .then(a.title.cmp(&b.title))
        });
        entries.truncate(limit.max(0) as usize);
        Ok(entries)
    }

    async fn seed_entries(&self, entries: &[TrendingEntry]) -> Result<bool, RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if !state.seed_markers.insert(TRENDING_SEED_MARKER.to_string()) {
            return Ok(false);
        }
        state.insert_entries(entries);
        Ok(true)
    }

    async fn replace_entries(&self, entries: &[TrendingEntry]) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        state.trending.clear();
        state.insert_entries(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use community_shared::types::Author;
    use std::sync::Arc;

    fn forum_post(title: &str, like_count: i64, comment_count: i64) -> Post {
        Post {
            id: Uuid::new_v4(),
            kind: TargetKind::Forum,
            title: title.to_string(),
            preview: format!("{title} preview"),
            category: "general".to_string(),
            body: None,
            author: Author {
                name: "Ana".to_string(),
                avatar: None,
            },
            like_count,
            comment_count,
            created_at: Utc::now(),
        }
    }

    fn new_comment(text: &str, parent_id: Option<Uuid>) -> NewComment {
        NewComment {
            parent_id,
            text: text.to_string(),
            author: Author {
                name: "Bo".to_string(),
                avatar: None,
            },
        }
    }

    #[tokio::test]
    async fn test_add_voter_is_conditional() {
        let store = InMemoryStore::new();
        let post = forum_post("Broken heating", 0, 0);
        let id = post.id;
        store.insert_post(post, vec![]).await;

        assert_eq!(store.add_voter(id, "u1").await.unwrap(), VoteOutcome::Applied(1));
        assert_eq!(store.add_voter(id, "u1").await.unwrap(), VoteOutcome::Unchanged(1));
        assert_eq!(store.has_voter(id, "u1").await.unwrap(), Some(true));

        assert_eq!(store.remove_voter(id, "u1").await.unwrap(), VoteOutcome::Applied(0));
        assert_eq!(store.remove_voter(id, "u1").await.unwrap(), VoteOutcome::Unchanged(0));
        assert_eq!(store.has_voter(id, "u1").await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_missing_target() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        assert_eq!(store.add_voter(id, "u1").await.unwrap(), VoteOutcome::TargetMissing);
        assert_eq!(store.remove_voter(id, "u1").await.unwrap(), VoteOutcome::TargetMissing);
        assert_eq!(store.has_voter(id, "u1").await.unwrap(), None);
        assert!(store.list_comments(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_voter_never_goes_negative() {
        let store = InMemoryStore::new();
        let post = forum_post("Mould in bathroom", 0, 0);
        let id = post.id;
        store.insert_post(post, vec!["u1".to_string()]).await;

        assert_eq!(store.remove_voter(id, "u1").await.unwrap(), VoteOutcome::Applied(0));
    }

    #[tokio::test]
    async fn test_concurrent_likes_from_distinct_voters() {
        let store = Arc::new(InMemoryStore::new());
        let post = forum_post("Noise at night", 0, 0);
        let id = post.id;
        store.insert_post(post, vec![]).await;

        let mut handles = Vec::new();
        for n in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add_voter(id, &format!("u{n}")).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(matches!(handle.await.unwrap(), VoteOutcome::Applied(_)));
        }

        let target = store.find_target(id).await.unwrap().unwrap();
        assert_eq!(target.like_count, 20);
        assert_eq!(target.voters.len(), 20);
    }

    #[tokio::test]
    async fn test_add_comment_bumps_count_and_records_notification() {
        let store = InMemoryStore::new();
        let post = forum_post("Rent increase", 0, 0);
        let id = post.id;
        store.insert_post(post, vec![]).await;

        let CommentInsert::Created(first) = store
            .add_comment(id, &new_comment("Same here", None))
            .await
            .unwrap()
        else {
            panic!("expected created comment");
        };
        let reply = store
            .add_comment(id, &new_comment("Which agency?", Some(first.id)))
            .await
            .unwrap();
        assert!(matches!(reply, CommentInsert::Created(ref c) if c.parent_id == Some(first.id)));

        let post = store.find_post(id).await.unwrap().unwrap();
        assert_eq!(post.comment_count, 2);

        let notifications = store.list_notifications(10).await.unwrap();
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].comment_body, "Which agency?");
        assert_eq!(notifications[0].title, "Rent increase");
    }

    #[tokio::test]
    async fn test_add_comment_rejects_parent_from_other_target() {
        let store = InMemoryStore::new();
        let first = forum_post("First", 0, 0);
        let second = forum_post("Second", 0, 0);
        let (first_id, second_id) = (first.id, second.id);
        store.insert_post(first, vec![]).await;
        store.insert_post(second, vec![]).await;

        let CommentInsert::Created(comment) = store
            .add_comment(first_id, &new_comment("hello", None))
            .await
            .unwrap()
        else {
            panic!("expected created comment");
        };

        let result = store
            .add_comment(second_id, &new_comment("reply", Some(comment.id)))
            .await
            .unwrap();
        assert_eq!(result, CommentInsert::ParentMissing);
        assert_eq!(store.find_post(second_id).await.unwrap().unwrap().comment_count, 0);
    }

    #[tokio::test]
    async fn test_top_by_engagement_orders_by_likes_then_comments() {
        let store = InMemoryStore::new();
        store.insert_post(forum_post("A", 10, 1), vec![]).await;
        store.insert_post(forum_post("B", 3, 2), vec![]).await;
        store.insert_post(forum_post("C", 7, 0), vec![]).await;
        store.insert_post(forum_post("D", 3, 5), vec![]).await;

        let titles: Vec<String> = store
            .top_by_engagement(TargetKind::Forum, 20)
            .await
            .unwrap()
            .into_iter()
            .map(|snapshot| snapshot.title)
            .collect();
        assert_eq!(titles, vec!["A", "C", "D", "B"]);
    }

    #[tokio::test]
    async fn test_record_engagement_upserts_and_orders() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        store.record_engagement("old", now - Duration::minutes(5)).await.unwrap();
        store.record_engagement("new", now).await.unwrap();
        store.record_engagement("hot", now - Duration::minutes(10)).await.unwrap();
        store.record_engagement("hot", now - Duration::minutes(9)).await.unwrap();

        let entries = store.top_entries(5).await.unwrap();
        let titles: Vec<&str> = entries.iter().map(|entry| entry.title.as_str()).collect();
        assert_eq!(titles, vec!["hot", "new", "old"]);
        assert_eq!(entries[0].score, 2);
        assert_eq!(entries[0].last_updated, now - Duration::minutes(9));
    }

    #[tokio::test]
    async fn test_seed_entries_runs_once() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let entry = |title: &str| TrendingEntry {
            title: title.to_string(),
            score: 3,
            last_updated: now,
        };

        assert!(store.seed_entries(&[entry("a")]).await.unwrap());
        assert!(!store.seed_entries(&[entry("b")]).await.unwrap());

        let titles: Vec<String> = store
            .top_entries(5)
            .await
            .unwrap()
            .into_iter()
            .map(|entry| entry.title)
            .collect();
        assert_eq!(titles, vec!["a"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.top_entries(5).await,
            Err(RepositoryError::Unavailable(_))
        ));
        store.set_unavailable(false);
        assert!(store.top_entries(5).await.unwrap().is_empty());
    }
}
