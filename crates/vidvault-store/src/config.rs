//! Store configuration.

use std::fmt;
use std::time::Duration;

use crate::error::{StoreError, StoreResult};

/// Connection settings for the catalog store.
#[derive(Clone)]
pub struct StoreConfig {
    /// Connection string (`postgres://...` or `memory://`)
    pub database_url: String,
    /// Maximum pooled connections
    pub max_connections: u32,
    /// Time to wait for a pooled connection
    pub acquire_timeout: Duration,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl StoreConfig {
    /// Create a config for a connection string with default pool settings.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }

    /// Create config from environment variables.
    ///
    /// `DATABASE_URL` is required; pool settings fall back to defaults.
    pub fn from_env() -> StoreResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::config_error("DATABASE_URL environment variable not set"))?;

        Ok(Self {
            database_url,
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            acquire_timeout: Duration::from_secs(
                std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
        })
    }

    /// True if the URL selects the in-memory store.
    pub fn is_memory(&self) -> bool {
        self.database_url.starts_with("memory:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_url() {
        let config = StoreConfig::new("postgres://user:hunter2@db/videos");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn test_memory_scheme() {
        assert!(StoreConfig::new("memory://").is_memory());
        assert!(!StoreConfig::new("postgres://localhost/videos").is_memory());
    }
}
