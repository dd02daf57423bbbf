//! Shared data models for the vidvault catalog.
//!
//! This crate provides Serde-serializable types for:
//! - Video records as stored in the catalog
//! - Display derivations (duration, sizes, compression, upload age)

pub mod format;
pub mod video;

// Re-export common types
pub use format::{compression_percentage, format_duration, format_relative_time, format_size};
pub use video::{Video, VideoId};
