//! Delivery URL templating.
//!
//! Every URL is a pure function of the public ID and a transformation preset.
//! Nothing here talks to the network.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;
use url::Url;

use crate::error::{MediaError, MediaResult};
use crate::transform::{Crop, Gravity, Quality, Transformation};

// ============================================================================
// Configuration
// ============================================================================

/// Default delivery host of the media service.
pub const DEFAULT_DELIVERY_URL: &str = "https://res.cloudinary.com";

/// Length of a long delivery signature.
const SIGNATURE_LEN: usize = 32;

/// Hover preview directive: 15s total, at most 9 segments of at least 1s each.
pub const PREVIEW_EFFECT: &str = "e_preview:duration_15:max_seg_9:min_seg_dur_1";

/// Media delivery configuration.
#[derive(Clone)]
pub struct MediaConfig {
    /// Account (cloud) name in the media service.
    pub cloud_name: String,
    /// Base URL of the delivery host.
    pub delivery_url: String,
    /// API secret used to sign delivery URLs. Unsigned when absent.
    pub signing_secret: Option<String>,
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("cloud_name", &self.cloud_name)
            .field("delivery_url", &self.delivery_url)
            .field("signing_secret", &self.signing_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl MediaConfig {
    /// Create an unsigned config for a cloud name.
    pub fn new(cloud_name: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            delivery_url: DEFAULT_DELIVERY_URL.to_string(),
            signing_secret: None,
        }
    }

    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .or_else(|_| std::env::var("NEXT_PUBLIC_CLOUDINARY_CLOUD_NAME"))
            .unwrap_or_default();

        Self {
            cloud_name,
            delivery_url: std::env::var("CLOUDINARY_DELIVERY_URL")
                .unwrap_or_else(|_| DEFAULT_DELIVERY_URL.to_string()),
            signing_secret: std::env::var("CLOUDINARY_API_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
        }
    }

    /// Enable signed delivery URLs.
    pub fn with_signing_secret(mut self, secret: impl Into<String>) -> Self {
        self.signing_secret = Some(secret.into());
        self
    }
}

// ============================================================================
// Presets
// ============================================================================

/// What a delivery URL is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaScope {
    /// Still frame shown on the card (400x225 jpg).
    Thumbnail,
    /// Short looping preview shown on hover (400x225).
    Preview,
    /// Full-resolution playback and download (up to 1920x1080).
    Full,
}

impl MediaScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaScope::Thumbnail => "thumbnail",
            MediaScope::Preview => "preview",
            MediaScope::Full => "full",
        }
    }

    /// Transformation preset for this scope.
    pub fn transformation(&self) -> Transformation {
        match self {
            MediaScope::Thumbnail => Transformation::new()
                .size(400, 225)
                .crop(Crop::Fill)
                .gravity(Gravity::Auto)
                .format("jpg")
                .quality(Quality::Auto),
            MediaScope::Preview => Transformation::new()
                .size(400, 225)
                .crop(Crop::Limit)
                .raw(PREVIEW_EFFECT)
                .format("auto")
                .quality(Quality::Auto),
            MediaScope::Full => Transformation::new()
                .size(1920, 1080)
                .crop(Crop::Limit)
                .format("auto")
                .quality(Quality::Auto),
        }
    }
}

// ============================================================================
// URL Builder
// ============================================================================

/// Builds delivery URLs for video assets.
#[derive(Debug, Clone)]
pub struct MediaUrlBuilder {
    base: String,
    signing_secret: Option<String>,
}

impl MediaUrlBuilder {
    /// Create a new builder, validating the configuration.
    pub fn new(config: MediaConfig) -> MediaResult<Self> {
        let cloud_name = config.cloud_name.trim();
        if cloud_name.is_empty() {
            return Err(MediaError::config_error("CLOUDINARY_CLOUD_NAME not configured"));
        }
        if cloud_name.contains('/') {
            return Err(MediaError::config_error(format!(
                "Invalid cloud name '{}'",
                cloud_name
            )));
        }

        let delivery = Url::parse(&config.delivery_url)?;
        if !matches!(delivery.scheme(), "http" | "https") {
            return Err(MediaError::config_error(format!(
                "Unsupported delivery URL scheme '{}'",
                delivery.scheme()
            )));
        }

        let base = format!(
            "{}/{}/video/upload",
            config.delivery_url.trim_end_matches('/'),
            cloud_name
        );
        debug!(base = %base, signed = config.signing_secret.is_some(), "Media URL builder ready");

        Ok(Self {
            base,
            signing_secret: config.signing_secret,
        })
    }

    /// Still-frame thumbnail URL.
    pub fn thumbnail_url(&self, public_id: &str) -> String {
        self.scoped_url(public_id, MediaScope::Thumbnail)
    }

    /// Hover preview URL.
    pub fn preview_url(&self, public_id: &str) -> String {
        self.scoped_url(public_id, MediaScope::Preview)
    }

    /// Full-resolution video URL (playback and download).
    pub fn full_url(&self, public_id: &str) -> String {
        self.scoped_url(public_id, MediaScope::Full)
    }

    /// URL for a preset scope.
    pub fn scoped_url(&self, public_id: &str, scope: MediaScope) -> String {
        self.url(public_id, &scope.transformation())
    }

    /// URL for an arbitrary transformation chain.
    pub fn url(&self, public_id: &str, transformation: &Transformation) -> String {
        let transformation = transformation.to_string();
        let encoded_id = encode_public_id(public_id);

        let path = if transformation.is_empty() {
            encoded_id
        } else {
            format!("{}/{}", transformation, encoded_id)
        };

        match &self.signing_secret {
            Some(secret) => format!("{}/s--{}--/{}", self.base, sign(&path, secret), path),
            None => format!("{}/{}", self.base, path),
        }
    }
}

/// Percent-encode each folder segment of a public ID.
fn encode_public_id(public_id: &str) -> String {
    public_id
        .trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Long URL signature over the transformation path.
fn sign(path: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update(secret.as_bytes());
    let digest = hasher.finalize();

    let mut signature = URL_SAFE_NO_PAD.encode(digest);
    signature.truncate(SIGNATURE_LEN);
    signature
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> MediaUrlBuilder {
        MediaUrlBuilder::new(MediaConfig::new("demo")).expect("valid config")
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            builder().thumbnail_url("videos/trip"),
            "https://res.cloudinary.com/demo/video/upload/c_fill,g_auto,h_225,w_400/f_jpg/q_auto/videos/trip"
        );
    }

    #[test]
    fn test_preview_url() {
        assert_eq!(
            builder().preview_url("trip"),
            "https://res.cloudinary.com/demo/video/upload/c_limit,h_225,w_400/e_preview:duration_15:max_seg_9:min_seg_dur_1/f_auto/q_auto/trip"
        );
    }

    #[test]
    fn test_full_url() {
        assert_eq!(
            builder().full_url("trip"),
            "https://res.cloudinary.com/demo/video/upload/c_limit,h_1080,w_1920/f_auto/q_auto/trip"
        );
    }

    #[test]
    fn test_urls_are_deterministic() {
        let b = builder();
        assert_eq!(b.full_url("a/b"), b.full_url("a/b"));
        assert_ne!(b.full_url("a/b"), b.preview_url("a/b"));
    }

    #[test]
    fn test_public_id_segments_encoded() {
        let url = builder().url("my folder/clip #1", &Transformation::new());
        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/video/upload/my%20folder/clip%20%231"
        );
    }

    #[test]
    fn test_signed_url() {
        let b = MediaUrlBuilder::new(MediaConfig::new("demo").with_signing_secret("s3cret"))
            .expect("valid config");
        let url = b.full_url("trip");

        let prefix = "https://res.cloudinary.com/demo/video/upload/s--";
        assert!(url.starts_with(prefix));
        let rest = &url[prefix.len()..];
        let (signature, tail) = rest.split_once("--/").expect("signature delimiter");
        assert_eq!(signature.len(), SIGNATURE_LEN);
        assert_eq!(tail, "c_limit,h_1080,w_1920/f_auto/q_auto/trip");
        assert_eq!(signature, sign(tail, "s3cret"));
    }

    #[test]
    fn test_custom_delivery_host() {
        let mut config = MediaConfig::new("acme");
        config.delivery_url = "https://media.example.com/".to_string();
        let url = MediaUrlBuilder::new(config).unwrap().thumbnail_url("x");
        assert!(url.starts_with("https://media.example.com/acme/video/upload/"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            MediaUrlBuilder::new(MediaConfig::new("")),
            Err(MediaError::ConfigError(_))
        ));

        let mut config = MediaConfig::new("demo");
        config.delivery_url = "not a url".to_string();
        assert!(matches!(MediaUrlBuilder::new(config), Err(MediaError::InvalidUrl(_))));

        let mut config = MediaConfig::new("demo");
        config.delivery_url = "ftp://res.cloudinary.com".to_string();
        assert!(matches!(MediaUrlBuilder::new(config), Err(MediaError::ConfigError(_))));
    }

    #[test]
    fn test_scope_str() {
        assert_eq!(MediaScope::Thumbnail.as_str(), "thumbnail");
        assert_eq!(MediaScope::Preview.as_str(), "preview");
        assert_eq!(MediaScope::Full.as_str(), "full");
    }
}
