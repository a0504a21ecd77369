//! Core configuration types for image extraction
//!
//! `GrabConfig` carries every knob the orchestrator, the metadata resolver
//! and the HTTP client need: timeouts, body caps, concurrency bounds and the
//! variant-selection strategy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the orchestrator picks one URL among variants sharing a content hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupStrategy {
    /// The first-discovered variant always wins; metadata runs after dedup.
    FirstDiscovered,
    /// Variants are resolved in discovery order until one is wider than the
    /// good-enough threshold; the widest known variant wins otherwise.
    #[default]
    PreferResolved,
}

impl std::fmt::Display for DedupStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DedupStrategy::FirstDiscovered => write!(f, "first-discovered"),
            DedupStrategy::PreferResolved => write!(f, "prefer-resolved"),
        }
    }
}

impl std::str::FromStr for DedupStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-discovered" => Ok(DedupStrategy::FirstDiscovered),
            "prefer" | "prefer-resolved" => Ok(DedupStrategy::PreferResolved),
            other => Err(anyhow::anyhow!("Unknown dedup strategy '{other}'")),
        }
    }
}

/// Main configuration struct for image extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrabConfig {
    /// Timeout for the page GET. Expiry is fatal for the extraction.
    pub(crate) page_timeout: Duration,
    /// Timeout for each image HEAD
    pub(crate) head_timeout: Duration,
    /// Timeout for each image GET issued for header sniffing
    pub(crate) image_timeout: Duration,
    pub(crate) connect_timeout: Duration,

    /// Maximum page body size in bytes
    pub(crate) max_page_bytes: usize,

    /// Maximum image body size read for sniffing, in bytes.
    /// Larger images keep their HEAD metadata but no dimensions.
    pub(crate) max_image_bytes: usize,

    /// Number of images resolved concurrently within one extraction
    /// Default: 8, Range: 1-64
    pub(crate) max_concurrent_resolutions: usize,

    /// Concurrent metadata fetches per image host
    /// Default: 4, Range: 1-16
    pub(crate) max_concurrent_per_host: usize,

    /// Run HEAD/GET metadata resolution on surviving images
    pub(crate) resolve_metadata: bool,

    pub(crate) dedup_strategy: DedupStrategy,

    pub(crate) user_agent: String,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self::builder().into_config()
    }
}
