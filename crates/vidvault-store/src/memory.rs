//! In-memory catalog for local development and tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use vidvault_models::{Video, VideoId};

use crate::error::{StoreError, StoreResult};
use crate::repo::VideoStore;

/// Catalog held in process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryVideoStore {
    videos: RwLock<Vec<Video>>,
}

impl MemoryVideoStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records.
    pub fn with_videos(videos: impl IntoIterator<Item = Video>) -> Self {
        Self {
            videos: RwLock::new(videos.into_iter().collect()),
        }
    }

    /// Add a record. IDs must be unique.
    pub async fn insert(&self, video: Video) -> StoreResult<VideoId> {
        let mut videos = self.videos.write().await;
        if videos.iter().any(|v| v.id == video.id) {
            return Err(StoreError::InvalidRecord(format!(
                "duplicate video id {}",
                video.id
            )));
        }
        let id = video.id.clone();
        videos.push(video);
        Ok(id)
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.videos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.videos.read().await.is_empty()
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn list(&self) -> StoreResult<Vec<Video>> {
        let mut videos = self.videos.read().await.clone();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn delete(&self, id: &VideoId) -> StoreResult<()> {
        let mut videos = self.videos.write().await;
        match videos.iter().position(|v| &v.id == id) {
            Some(index) => {
                videos.remove(index);
                Ok(())
            }
            None => Err(StoreError::not_found(id.as_str())),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_list_newest_first() {
        let now = Utc::now();
        let v1 = Video::new("v1", "p1", 1.0, 10, 5).created(now);
        let v2 = Video::new("v2", "p2", 1.0, 10, 5).created(now - Duration::minutes(5));
        let store = MemoryVideoStore::with_videos([v2.clone(), v1.clone()]);

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![v1, v2]);
    }

    #[tokio::test]
    async fn test_delete() {
        let video = Video::new("v", "p", 1.0, 10, 5);
        let store = MemoryVideoStore::new();
        let id = store.insert(video).await.unwrap();

        store.delete(&id).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryVideoStore::new();
        let err = store.delete(&VideoId::from("nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let video = Video::new("v", "p", 1.0, 10, 5);
        let store = MemoryVideoStore::new();
        store.insert(video.clone()).await.unwrap();
        assert!(matches!(
            store.insert(video).await,
            Err(StoreError::InvalidRecord(_))
        ));
        assert_eq!(store.len().await, 1);
    }
}
