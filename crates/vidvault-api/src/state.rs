//! Application state.

use std::sync::Arc;

use tracing::{info, warn};
use vidvault_media::{MediaConfig, MediaUrlBuilder};
use vidvault_store::{StoreConfig, VideoStore};

use crate::access::AccessPolicy;
use crate::auth::SessionVerifier;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn VideoStore>,
    pub media: Arc<MediaUrlBuilder>,
    pub sessions: Arc<SessionVerifier>,
    pub access: AccessPolicy,
}

impl AppState {
    /// Create new application state from the environment.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store_config = StoreConfig::from_env()?;
        info!(store = ?store_config, "Connecting to video store");
        let store = vidvault_store::connect(&store_config).await?;

        let media = MediaUrlBuilder::new(MediaConfig::from_env())?;

        let sessions = SessionVerifier::from_config(&config.auth)?;
        match sessions.warm_up().await {
            Ok(0) => {}
            Ok(count) => info!("Loaded {} session signing keys", count),
            Err(e) => warn!("Failed to prefetch session signing keys: {}", e),
        }

        Ok(Self::from_parts(config, store, media, sessions))
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(
        config: ApiConfig,
        store: Arc<dyn VideoStore>,
        media: MediaUrlBuilder,
        sessions: SessionVerifier,
    ) -> Self {
        Self {
            config,
            store,
            media: Arc::new(media),
            sessions: Arc::new(sessions),
            access: AccessPolicy::default(),
        }
    }
}
