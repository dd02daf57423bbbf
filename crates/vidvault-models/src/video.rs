//! Video catalog models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::format;

/// Unique identifier of a catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A compressed video known to the catalog.
///
/// The media itself lives with the hosting service; `public_id` is the
/// handle used to derive its delivery URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Unique ID, assigned by the store
    pub id: VideoId,

    /// Video title
    pub title: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Asset reference in the media service
    pub public_id: String,

    /// Duration in seconds
    pub duration: f64,

    /// Size of the uploaded file in bytes
    pub original_size: u64,

    /// Size after compression in bytes
    pub compressed_size: u64,

    /// Creation timestamp (immutable)
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Create a new record stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        public_id: impl Into<String>,
        duration: f64,
        original_size: u64,
        compressed_size: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            title: title.into(),
            description: None,
            public_id: public_id.into(),
            duration,
            original_size,
            compressed_size,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the creation timestamp.
    pub fn created(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// Duration as `m:ss`.
    pub fn duration_display(&self) -> String {
        format::format_duration(self.duration)
    }

    /// Human-readable original size.
    pub fn original_size_display(&self) -> String {
        format::format_size(self.original_size)
    }

    /// Human-readable compressed size.
    pub fn compressed_size_display(&self) -> String {
        format::format_size(self.compressed_size)
    }

    /// Percentage saved by compression.
    pub fn compression_percentage(&self) -> i64 {
        format::compression_percentage(self.original_size, self.compressed_size)
    }

    /// Upload age relative to `now`, e.g. "3 days ago".
    pub fn uploaded_ago(&self, now: DateTime<Utc>) -> String {
        format::format_relative_time(self.created_at, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_generation() {
        let id1 = VideoId::new();
        let id2 = VideoId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_video_serializes_camel_case() {
        let video = Video::new("Trip", "uploads/trip", 125.0, 1000, 250);
        let json = serde_json::to_value(&video).unwrap();

        assert_eq!(json["publicId"], "uploads/trip");
        assert_eq!(json["originalSize"], 1000);
        assert_eq!(json["compressedSize"], 250);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_video_deserializes_without_description() {
        let json = r#"{
            "id": "abc",
            "title": "Clip",
            "publicId": "p1",
            "duration": 12.5,
            "originalSize": 2048,
            "compressedSize": 1024,
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        }"#;
        let video: Video = serde_json::from_str(json).unwrap();
        assert_eq!(video.id.as_str(), "abc");
        assert_eq!(video.description, None);
        assert_eq!(video.compression_percentage(), 50);
    }

    #[test]
    fn test_display_helpers() {
        let video = Video::new("Trip", "p", 125.0, 1000, 250);
        assert_eq!(video.duration_display(), "2:05");
        assert_eq!(video.compression_percentage(), 75);
        assert_eq!(video.original_size_display(), "1 kB");
        assert_eq!(video.compressed_size_display(), "250 B");
    }
}
