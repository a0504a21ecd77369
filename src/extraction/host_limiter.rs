//! Per-host concurrency limiter for metadata fetches
//!
//! Keeps the HEAD/GET fan-out of a single extraction from hammering one
//! image host, independently of the global resolution bound.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Per-host concurrency limiter using lock-free `DashMap`
///
/// Each host gets its own semaphore, created lazily on first use.
#[derive(Debug)]
pub struct HostLimiter {
    host_semaphores: DashMap<String, Arc<Semaphore>>,
    max_per_host: usize,
}

impl HostLimiter {
    /// Create a new limiter with the specified per-host limit
    #[must_use]
    pub fn new(max_per_host: usize) -> Self {
        Self {
            host_semaphores: DashMap::new(),
            max_per_host: max_per_host.max(1),
        }
    }

    /// Acquire a permit for `host`, released when dropped
    ///
    /// Semaphores are never closed, so `None` only signals a broken
    /// invariant; callers proceed unthrottled in that case.
    pub async fn acquire(&self, host: &str) -> Option<OwnedSemaphorePermit> {
        let semaphore = self
            .host_semaphores
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.max_per_host)))
            .clone();

        match semaphore.acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(_) => {
                log::error!("Semaphore for host '{host}' was closed unexpectedly");
                None
            }
        }
    }

    /// Permits currently available for `host`
    #[must_use]
    pub fn available(&self, host: &str) -> usize {
        self.host_semaphores
            .get(host)
            .map_or(self.max_per_host, |s| s.available_permits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn permits_are_per_host_and_released_on_drop() {
        let limiter = HostLimiter::new(2);

        let a1 = limiter.acquire("a.example.com").await;
        let a2 = limiter.acquire("a.example.com").await;
        assert!(a1.is_some() && a2.is_some());
        assert_eq!(limiter.available("a.example.com"), 0);
        assert_eq!(limiter.available("b.example.com"), 2);

        drop(a1);
        assert_eq!(limiter.available("a.example.com"), 1);
    }

    #[tokio::test]
    async fn third_acquire_waits_for_release() {
        let limiter = Arc::new(HostLimiter::new(1));
        let held = limiter.acquire("slow.example.com").await;

        let waiter = {
            let limiter = limiter.clone();
            tokio::spawn(async move { limiter.acquire("slow.example.com").await.is_some() })
        };

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(held);
        assert!(waiter.await.expect("task should not panic"));
    }
}
