//! Data access trait for the video catalog.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use vidvault_models::{Video, VideoId};

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::memory::MemoryVideoStore;
use crate::postgres::PgVideoStore;

/// Catalog operations used by the HTTP layer.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// All videos, newest first. Fails as a whole on any store error.
    async fn list(&self) -> StoreResult<Vec<Video>>;

    /// Delete a video by ID.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) when no
    /// record has that ID.
    async fn delete(&self, id: &VideoId) -> StoreResult<()>;

    /// Check that the store is reachable.
    async fn ping(&self) -> StoreResult<()>;
}

/// Open the store selected by the connection string.
///
/// `memory://` yields an empty in-memory catalog; anything else is treated
/// as a PostgreSQL URL and migrated on connect.
pub async fn connect(config: &StoreConfig) -> StoreResult<Arc<dyn VideoStore>> {
    if config.is_memory() {
        info!("Using in-memory video store");
        return Ok(Arc::new(MemoryVideoStore::new()));
    }

    let store = PgVideoStore::connect(config).await?;
    store.migrate().await?;
    info!("Connected to PostgreSQL video store");
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory() {
        let store = connect(&StoreConfig::new("memory://")).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        store.ping().await.unwrap();
    }
}
