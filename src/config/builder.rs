//! Fluent builder for `GrabConfig`
//!
//! Every field has a default, so `GrabConfig::builder().build()` is valid.
//! `build()` validates concurrency bounds and timeouts once, up front, so the
//! extraction hot path never has to.

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_HEAD_TIMEOUT, DEFAULT_IMAGE_TIMEOUT,
    DEFAULT_MAX_CONCURRENT_PER_HOST, DEFAULT_MAX_CONCURRENT_RESOLUTIONS, DEFAULT_MAX_IMAGE_BYTES,
    DEFAULT_MAX_PAGE_BYTES, DEFAULT_PAGE_TIMEOUT, MAX_CONCURRENT_PER_HOST_LIMIT,
    MAX_CONCURRENT_RESOLUTIONS_LIMIT,
};
use anyhow::{Result, anyhow};
use std::time::Duration;

use super::types::{DedupStrategy, GrabConfig};

#[derive(Debug, Clone)]
pub struct GrabConfigBuilder {
    page_timeout: Duration,
    head_timeout: Duration,
    image_timeout: Duration,
    connect_timeout: Duration,
    max_page_bytes: usize,
    max_image_bytes: usize,
    max_concurrent_resolutions: usize,
    max_concurrent_per_host: usize,
    resolve_metadata: bool,
    dedup_strategy: DedupStrategy,
    user_agent: String,
}

impl Default for GrabConfigBuilder {
    fn default() -> Self {
        Self {
            page_timeout: DEFAULT_PAGE_TIMEOUT,
            head_timeout: DEFAULT_HEAD_TIMEOUT,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_page_bytes: DEFAULT_MAX_PAGE_BYTES,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            max_concurrent_resolutions: DEFAULT_MAX_CONCURRENT_RESOLUTIONS,
            max_concurrent_per_host: DEFAULT_MAX_CONCURRENT_PER_HOST,
            resolve_metadata: true,
            dedup_strategy: DedupStrategy::default(),
            user_agent: CHROME_USER_AGENT.to_string(),
        }
    }
}

impl GrabConfig {
    /// Create a builder for configuring a `GrabConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> GrabConfigBuilder {
        GrabConfigBuilder::default()
    }
}

impl GrabConfigBuilder {
    #[must_use]
    pub fn page_timeout(mut self, timeout: Duration) -> Self {
        self.page_timeout = timeout;
        self
    }

    #[must_use]
    pub fn head_timeout(mut self, timeout: Duration) -> Self {
        self.head_timeout = timeout;
        self
    }

    #[must_use]
    pub fn image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Apply one timeout to the page fetch, HEAD and sniff GET alike
    #[must_use]
    pub fn request_timeout(self, timeout: Duration) -> Self {
        self.page_timeout(timeout)
            .head_timeout(timeout)
            .image_timeout(timeout)
    }

    #[must_use]
    pub fn max_page_bytes(mut self, bytes: usize) -> Self {
        self.max_page_bytes = bytes;
        self
    }

    #[must_use]
    pub fn max_image_bytes(mut self, bytes: usize) -> Self {
        self.max_image_bytes = bytes;
        self
    }

    #[must_use]
    pub fn max_concurrent_resolutions(mut self, n: usize) -> Self {
        self.max_concurrent_resolutions = n;
        self
    }

    #[must_use]
    pub fn max_concurrent_per_host(mut self, n: usize) -> Self {
        self.max_concurrent_per_host = n;
        self
    }

    #[must_use]
    pub fn resolve_metadata(mut self, enabled: bool) -> Self {
        self.resolve_metadata = enabled;
        self
    }

    #[must_use]
    pub fn dedup_strategy(mut self, strategy: DedupStrategy) -> Self {
        self.dedup_strategy = strategy;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validate and produce the config
    ///
    /// # Errors
    ///
    /// Returns an error if a concurrency bound is zero or above its limit,
    /// a timeout is zero, a body cap is zero, or the user agent is empty.
    pub fn build(self) -> Result<GrabConfig> {
        if !(1..=MAX_CONCURRENT_RESOLUTIONS_LIMIT).contains(&self.max_concurrent_resolutions) {
            return Err(anyhow!(
                "max_concurrent_resolutions must be between 1 and {MAX_CONCURRENT_RESOLUTIONS_LIMIT}, got {}",
                self.max_concurrent_resolutions
            ));
        }
        if !(1..=MAX_CONCURRENT_PER_HOST_LIMIT).contains(&self.max_concurrent_per_host) {
            return Err(anyhow!(
                "max_concurrent_per_host must be between 1 and {MAX_CONCURRENT_PER_HOST_LIMIT}, got {}",
                self.max_concurrent_per_host
            ));
        }

        for (name, timeout) in [
            ("page_timeout", self.page_timeout),
            ("head_timeout", self.head_timeout),
            ("image_timeout", self.image_timeout),
            ("connect_timeout", self.connect_timeout),
        ] {
            if timeout.is_zero() {
                return Err(anyhow!("{name} must be greater than zero"));
            }
        }

        if self.max_page_bytes == 0 || self.max_image_bytes == 0 {
            return Err(anyhow!("body size limits must be greater than zero"));
        }

        if self.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent must not be empty"));
        }

        Ok(self.into_config())
    }

    /// Produce the config without validation
    pub(crate) fn into_config(self) -> GrabConfig {
        GrabConfig {
            page_timeout: self.page_timeout,
            head_timeout: self.head_timeout,
            image_timeout: self.image_timeout,
            connect_timeout: self.connect_timeout,
            max_page_bytes: self.max_page_bytes,
            max_image_bytes: self.max_image_bytes,
            max_concurrent_resolutions: self.max_concurrent_resolutions,
            max_concurrent_per_host: self.max_concurrent_per_host,
            resolve_metadata: self.resolve_metadata,
            dedup_strategy: self.dedup_strategy,
            user_agent: self.user_agent,
        }
    }
}
