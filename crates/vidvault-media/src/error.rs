//! Media error types.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while configuring media delivery.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to configure media delivery: {0}")]
    ConfigError(String),

    #[error("Invalid delivery URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl MediaError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
