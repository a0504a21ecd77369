//! Discrete quality tiers derived from byte size and pixel dimensions

use serde::{Deserialize, Serialize};

/// Quality tier of a resolved image
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
}

impl Quality {
    /// Classify an image from its byte size and dimensions
    ///
    /// - `high`: more than 3 bytes per pixel, or larger than 1920x1080 on both axes
    /// - `medium`: more than 1 byte per pixel, or larger than 800x600 on both axes
    /// - `low`: everything else
    ///
    /// Zero-sized images and zero-pixel dimensions have no tier.
    #[must_use]
    pub fn classify(size: u64, width: u32, height: u32) -> Option<Self> {
        if size == 0 || width == 0 || height == 0 {
            return None;
        }

        let pixels = f64::from(width) * f64::from(height);
        #[allow(clippy::cast_precision_loss)]
        let bytes_per_pixel = size as f64 / pixels;

        let tier = if bytes_per_pixel > 3.0 || (width > 1920 && height > 1080) {
            Quality::High
        } else if bytes_per_pixel > 1.0 || (width > 800 && height > 600) {
            Quality::Medium
        } else {
            Quality::Low
        };
        Some(tier)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Low => write!(f, "low"),
            Quality::Medium => write!(f, "medium"),
            Quality::High => write!(f, "high"),
        }
    }
}
