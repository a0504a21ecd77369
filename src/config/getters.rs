//! Getter methods for `GrabConfig`

use std::time::Duration;

use super::types::{DedupStrategy, GrabConfig};

impl GrabConfig {
    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        self.page_timeout
    }

    #[must_use]
    pub fn head_timeout(&self) -> Duration {
        self.head_timeout
    }

    #[must_use]
    pub fn image_timeout(&self) -> Duration {
        self.image_timeout
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    #[must_use]
    pub fn max_page_bytes(&self) -> usize {
        self.max_page_bytes
    }

    #[must_use]
    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes
    }

    #[must_use]
    pub fn max_concurrent_resolutions(&self) -> usize {
        self.max_concurrent_resolutions
    }

    #[must_use]
    pub fn max_concurrent_per_host(&self) -> usize {
        self.max_concurrent_per_host
    }

    #[must_use]
    pub fn resolve_metadata(&self) -> bool {
        self.resolve_metadata
    }

    #[must_use]
    pub fn dedup_strategy(&self) -> DedupStrategy {
        self.dedup_strategy
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
