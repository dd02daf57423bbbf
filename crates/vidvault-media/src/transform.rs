//! Transformation parameters understood by the media service.
//!
//! A [`Transformation`] renders to the slash-separated component path that
//! sits between `upload/` and the public ID in a delivery URL.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resize mode (`c_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crop {
    /// Fill the box exactly, cropping the overflow.
    Fill,
    /// Shrink to fit inside the box, never upscale.
    Limit,
    /// Scale to the box, ignoring aspect ratio.
    Scale,
}

impl Crop {
    pub fn as_str(&self) -> &'static str {
        match self {
            Crop::Fill => "fill",
            Crop::Limit => "limit",
            Crop::Scale => "scale",
        }
    }
}

/// Focal point used when cropping (`g_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    Auto,
    Center,
}

impl Gravity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::Auto => "auto",
            Gravity::Center => "center",
        }
    }
}

/// Output quality (`q_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Auto,
    Fixed(u8),
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Auto => write!(f, "auto"),
            Quality::Fixed(q) => write!(f, "{}", q),
        }
    }
}

/// A chain of delivery transformations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformation {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<Crop>,
    pub gravity: Option<Gravity>,
    /// Output format (`f_*`), e.g. `jpg` or `auto`.
    pub format: Option<String>,
    pub quality: Option<Quality>,
    /// Verbatim components such as effect directives.
    pub raw: Vec<String>,
}

impl Transformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn raw(mut self, component: impl Into<String>) -> Self {
        self.raw.push(component.into());
        self
    }

    /// Render the component list, resize first, then raw directives, then
    /// format and quality. Resize parameters are sorted by key.
    pub fn components(&self) -> Vec<String> {
        let mut components = Vec::new();

        let mut resize = Vec::new();
        if let Some(crop) = self.crop {
            resize.push(format!("c_{}", crop.as_str()));
        }
        if let Some(gravity) = self.gravity {
            resize.push(format!("g_{}", gravity.as_str()));
        }
        if let Some(height) = self.height {
            resize.push(format!("h_{}", height));
        }
        if let Some(width) = self.width {
            resize.push(format!("w_{}", width));
        }
        if !resize.is_empty() {
            components.push(resize.join(","));
        }

        components.extend(self.raw.iter().cloned());

        if let Some(format) = &self.format {
            components.push(format!("f_{}", format));
        }
        if let Some(quality) = self.quality {
            components.push(format!("q_{}", quality));
        }

        components
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components().join("/"))
    }
}
