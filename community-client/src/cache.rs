//! Per-session record of the targets the voter has liked.
//!
//! The cache is stored as a JSON array of target ids. It is only a hint for the
//! initial `voted` flag; the server remains authoritative.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::errors::CacheError;

#[derive(Debug, Clone, Default)]
pub struct VoteCache {
    path: Option<PathBuf>,
    liked: BTreeSet<Uuid>,
}

impl VoteCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the cache stored at `path`.
    ///
    /// A missing file yields an empty cache. A file that does not hold a JSON
    /// array of ids is discarded with a warning and the cache starts empty.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let liked = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<BTreeSet<Uuid>>(&bytes) {
                Ok(liked) => liked,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Resetting corrupted vote cache");
                    BTreeSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            liked,
        })
    }

    /// Writes the cache back to the file it was loaded from.
    pub async fn save(&self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec(&self.liked)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    pub fn is_liked(&self, target_id: Uuid) -> bool {
        self.liked.contains(&target_id)
    }

    pub fn set_liked(&mut self, target_id: Uuid, liked: bool) {
        if liked {
            self.liked.insert(target_id);
        } else {
            self.liked.remove(&target_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("likes.json");
        let id = Uuid::new_v4();

        let mut cache = VoteCache::load(&path).await.unwrap();
        assert!(!cache.is_liked(id));
        cache.set_liked(id, true);
        cache.save().await.unwrap();

        let reloaded = VoteCache::load(&path).await.unwrap();
        assert!(reloaded.is_liked(id));
    }

    #[tokio::test]
    async fn test_corrupted_file_is_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("likes.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let cache = VoteCache::load(&path).await.unwrap();
        assert!(!cache.is_liked(Uuid::new_v4()));

        cache.save().await.unwrap();
        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "[]");
    }

    #[tokio::test]
    async fn test_unlike_removes_entry() {
        let mut cache = VoteCache::in_memory();
        let id = Uuid::new_v4();
        cache.set_liked(id, true);
        cache.set_liked(id, false);
        assert!(!cache.is_liked(id));
        cache.save().await.unwrap();
    }
}
