//! Hosted media service delivery URLs.
//!
//! This crate provides:
//! - Transformation presets for thumbnails, hover previews and full playback
//! - Deterministic URL templating against the media service's URL scheme
//! - Optional long-signature delivery URLs

pub mod delivery;
pub mod error;
pub mod transform;

pub use delivery::{MediaConfig, MediaScope, MediaUrlBuilder};
pub use error::{MediaError, MediaResult};
pub use transform::{Crop, Gravity, Quality, Transformation};
