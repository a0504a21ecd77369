//! Extraction orchestrator
//!
//! `fetch page -> parse -> harvest -> resolve + dedup -> metadata -> list`.
//!
//! Only the page fetch can fail the whole extraction. Metadata resolution
//! fans out over at most `max_concurrent_resolutions` images (and at most
//! `max_concurrent_per_host` per host) with the output kept in discovery
//! order. Dropping the returned future cancels every in-flight request.

use futures::stream::{self, StreamExt};
use reqwest::Client;
use scraper::Html;
use std::sync::Arc;
use url::Url;

use super::client::{build_client, fetch_page};
use super::dedup::{DedupEntry, DedupIndex, Offer};
use super::host_limiter::HostLimiter;
use super::types::{ExtractError, ExtractResult, ResolvedImage};
use crate::config::{DedupStrategy, GrabConfig};
use crate::harvest::{document_base, harvest, resolve_candidates};
use crate::metadata::MetadataResolver;

/// Extracts the deduplicated image list of a page
///
/// Cheap to clone; clones share the HTTP client and per-host limiter.
#[derive(Debug, Clone)]
pub struct ImageExtractor {
    client: Client,
    config: Arc<GrabConfig>,
    resolver: MetadataResolver,
    hosts: Arc<HostLimiter>,
}

impl ImageExtractor {
    /// Create an extractor with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns `ExtractError::Client` if the HTTP client cannot be built.
    pub fn new(config: GrabConfig) -> ExtractResult<Self> {
        let client = build_client(&config)?;
        Ok(Self::with_client(client, config))
    }

    /// Create an extractor around an existing client
    #[must_use]
    pub fn with_client(client: Client, config: GrabConfig) -> Self {
        let config = Arc::new(config);
        Self {
            resolver: MetadataResolver::new(client.clone(), config.clone()),
            hosts: Arc::new(HostLimiter::new(config.max_concurrent_per_host())),
            client,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GrabConfig {
        &self.config
    }

    /// Extract every image referenced by `page_url`
    ///
    /// # Errors
    ///
    /// Fails only when the page URL is invalid or the page cannot be fetched.
    pub async fn extract(&self, page_url: &str) -> ExtractResult<Vec<ResolvedImage>> {
        let page = parse_page_url(page_url)?;

        let html = fetch_page(&self.client, &page, &self.config)
            .await
            .inspect_err(|e| log::warn!("Page fetch failed: {e}"))?;

        let entries = discover(&html, &page);
        log::debug!("{} distinct images discovered on {page}", entries.len());

        if !self.config.resolve_metadata() {
            return Ok(entries.into_iter().map(|entry| entry.image).collect());
        }

        let images = stream::iter(entries)
            .map(|entry| self.settle(entry))
            .buffered(self.config.max_concurrent_resolutions())
            .collect::<Vec<_>>()
            .await;

        Ok(images)
    }

    /// Pick and resolve the image that represents one content-hash key
    async fn settle(&self, entry: DedupEntry) -> ResolvedImage {
        match self.config.dedup_strategy() {
            DedupStrategy::FirstDiscovered => self.resolve_one(entry.image).await,
            DedupStrategy::PreferResolved => self.prefer_resolved(entry).await,
        }
    }

    /// Resolve variants in discovery order until one is good enough
    ///
    /// Falls back to the widest variant with known dimensions, then to the
    /// first-discovered variant.
    async fn prefer_resolved(&self, entry: DedupEntry) -> ResolvedImage {
        let mut best = self.resolve_one(entry.image).await;
        if best.is_good_enough() {
            return best;
        }

        for variant in entry.alternates {
            let resolved = self.resolve_one(variant).await;
            if resolved.is_good_enough() {
                return resolved;
            }
            if resolved.width > best.width {
                best = resolved;
            }
        }

        best
    }

    /// Resolve metadata for one image under its host's concurrency limit
    async fn resolve_one(&self, image: ResolvedImage) -> ResolvedImage {
        let host = Url::parse(&image.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        let _permit = self.hosts.acquire(&host).await;
        let metadata = self.resolver.resolve(&image.url).await;
        image.with_metadata(metadata)
    }
}

/// Harvest and deduplicate candidates from a page body
///
/// Synchronous so the non-`Send` parsed document never lives across an await.
#[must_use]
pub fn discover(html: &str, page: &Url) -> Vec<DedupEntry> {
    let document = Html::parse_document(html);
    let base = document_base(&document, page);
    let candidates = harvest(&document);

    let mut index = DedupIndex::new();
    for (candidate, url) in resolve_candidates(&candidates, &base) {
        let offer = index.offer(&url);
        if offer != Offer::Inserted {
            log::debug!("{} candidate {url}: {offer:?}", candidate.source);
        }
    }
    index.into_entries()
}

fn parse_page_url(page_url: &str) -> ExtractResult<Url> {
    let page = Url::parse(page_url.trim()).map_err(|e| ExtractError::InvalidPageUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;

    match page.scheme() {
        "http" | "https" => Ok(page),
        other => Err(ExtractError::InvalidPageUrl {
            url: page_url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::content_hash;

    fn page() -> Url {
        Url::parse("https://cdn.example.com/page").expect("valid")
    }

    #[test]
    fn end_to_end_variants_collapse_to_one_image() {
        let html = r#"
            <img src="/a.jpg">
            <img src="https://cdn.example.com/a-300x300.jpg">
            <div style="background-image: url('https://cdn.example.com/a.jpg?v=123')"></div>"#;
        let entries = discover(html, &page());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].image.url, "https://cdn.example.com/a.jpg");
        // the cache-busted copy is an exact duplicate of /a.jpg
        assert_eq!(entries[0].alternates.len(), 1);
    }

    #[test]
    fn no_two_entries_share_a_content_hash() {
        let html = r#"
            <div class="slider"><div class="image-wrap">
              <img src="/p/1-150x150.jpg" srcset="/p/1-300x300.jpg 300w, /p/1.jpg 1200w">
            </div></div>
            <img src="/p/1.jpg"><img src="/p/2_640.png"><img data-src="/p/2.png">
            <picture><source srcset="/p/3.webp 1x, /p/3-800.webp 2x"></picture>
            <script type="application/ld+json">{"image": "/p/1.jpg"}</script>"#;
        let entries = discover(html, &page());

        let mut keys: Vec<String> = entries.iter().map(|e| content_hash(&e.image.url)).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 3);
    }

    #[test]
    fn data_uris_never_surface() {
        let html = r#"
            <img src="data:image/png;base64,iVBORw0KGgoAAAANSUhEUg==" data-src="/real.jpg">
            <img src="/real.jpg" srcset="data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7 1x">
            <picture><source srcset="data:image/gif;base64,R0lGODlhAQABAAAAACw= 1x"></picture>
            <div style="background-image: url(data:image/gif;base64,R0lGODlhAQABAAAAACw=)"></div>"#;
        let entries = discover(html, &page());

        let urls: Vec<&str> = entries
            .iter()
            .flat_map(DedupEntry::variants)
            .map(|i| i.url.as_str())
            .collect();
        assert_eq!(urls, vec!["https://cdn.example.com/real.jpg"]);
    }

    #[test]
    fn origin_is_part_of_the_variant_key() {
        let page = Url::parse("https://example.com/page").expect("valid");
        let html = r#"
            <img src="/a.jpg">
            <img src="https://cdn.example.com/a-300x300.jpg">
            <div style="background-image: url('https://cdn.example.com/a.jpg?v=123')"></div>"#;
        let entries = discover(html, &page);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].image.url, "https://example.com/a.jpg");
        assert!(entries[0].alternates.is_empty());
        assert_eq!(entries[1].image.url, "https://cdn.example.com/a-300x300.jpg");
        let alternates: Vec<_> = entries[1].alternates.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(alternates, vec!["https://cdn.example.com/a.jpg?v=123"]);
    }

    #[test]
    fn empty_page_yields_no_entries() {
        assert!(discover("<html><body><p>No pictures</p></body></html>", &page()).is_empty());
    }

    #[test]
    fn page_url_validation() {
        assert!(parse_page_url("https://example.com/x").is_ok());
        assert!(matches!(
            parse_page_url("ftp://example.com/x"),
            Err(ExtractError::InvalidPageUrl { .. })
        ));
        assert!(matches!(
            parse_page_url("example.com"),
            Err(ExtractError::InvalidPageUrl { .. })
        ));
    }
}
