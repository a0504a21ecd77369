//! Insertion-ordered deduplication of image candidates
//!
//! Candidates are compared twice: exact duplicates by URL with cache-busting
//! parameters removed, then resolution variants by content-hash key. Size
//! parameters (`?w=1200`) survive the first check so CDN renditions reach the
//! index as alternates. Each key keeps its first
//! discovered image as the entry, in discovery order, plus later variants as
//! alternates. Once an entry is known to be wider than the good-enough
//! threshold, further variants for its key are skipped.

use std::collections::{HashMap, HashSet};
use url::Url;

use super::types::ResolvedImage;
use crate::normalize::{content_hash_url, strip_cache_busting_url};

/// Outcome of offering one candidate to the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// New content-hash key; the candidate became the entry
    Inserted,
    /// Known key; the candidate was kept as an alternate variant
    Alternate,
    /// Known key whose entry is already good enough; candidate discarded
    Skipped,
    /// Same URL, up to cache-busting parameters, seen before; candidate discarded
    ExactDuplicate,
}

/// All variants discovered for one content-hash key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupEntry {
    pub key: String,
    pub image: ResolvedImage,
    pub alternates: Vec<ResolvedImage>,
}

impl DedupEntry {
    /// Whether the entry already carries a width above the threshold
    #[must_use]
    pub fn is_good_enough(&self) -> bool {
        self.image.is_good_enough()
    }

    /// Entry image followed by alternates, in discovery order
    pub fn variants(&self) -> impl Iterator<Item = &ResolvedImage> {
        std::iter::once(&self.image).chain(self.alternates.iter())
    }
}

/// Ordered map from content-hash key to `DedupEntry`
#[derive(Debug, Default)]
pub struct DedupIndex {
    entries: Vec<DedupEntry>,
    positions: HashMap<String, usize>,
    seen: HashSet<String>,
}

impl DedupIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one resolved candidate URL
    pub fn offer(&mut self, url: &Url) -> Offer {
        let exact = strip_cache_busting_url(url).unwrap_or_else(|| url.to_string());
        if !self.seen.insert(exact) {
            return Offer::ExactDuplicate;
        }

        let key = content_hash_url(url).unwrap_or_else(|| url.to_string());

        if let Some(entry) = self
            .positions
            .get(&key)
            .and_then(|&idx| self.entries.get_mut(idx))
        {
            if entry.is_good_enough() {
                return Offer::Skipped;
            }
            entry.alternates.push(ResolvedImage::from_url(url));
            return Offer::Alternate;
        }

        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push(DedupEntry {
            key,
            image: ResolvedImage::from_url(url),
            alternates: Vec::new(),
        });
        Offer::Inserted
    }

    /// Mutable access to the entry for `key`
    pub fn entry_mut(&mut self, key: &str) -> Option<&mut DedupEntry> {
        self.positions
            .get(key)
            .and_then(|&idx| self.entries.get_mut(idx))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-discovery order
    #[must_use]
    pub fn into_entries(self) -> Vec<DedupEntry> {
        self.entries
    }

    /// Entry images in first-discovery order, alternates dropped
    #[must_use]
    pub fn into_images(self) -> Vec<ResolvedImage> {
        self.entries.into_iter().map(|entry| entry.image).collect()
    }
}
