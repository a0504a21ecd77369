//! URL normalization and content-hash keys for image deduplication
//!
//! Two levels of identity:
//! - [`normalize`] removes cache-busting parameters so that `a.jpg?v=1` and
//!   `a.jpg?v=2` compare equal, and collapses CDN resize queries down to
//!   `origin + path`.
//! - [`content_hash`] is coarser: it drops the query entirely and strips
//!   numeric size suffixes (`-300x300`, `_150`) from the filename so every
//!   rendition of the same asset shares one key.
//!
//! Both fall back to returning the input unchanged when it does not parse.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::utils::constants::{CACHE_BUSTING_PARAMS, SIZE_PARAMS};

lazy_static! {
    // Hardcoded pattern; failure to compile is a programming error.
    static ref SIZE_SUFFIX: Regex =
        Regex::new(r"[-_]\d+(?:x\d+)?$")
            .expect("BUG: hardcoded size suffix regex is invalid");
}

/// Normalize an absolute image URL for cache-busting-agnostic comparison
#[must_use]
pub fn normalize(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => normalize_url(&parsed).unwrap_or_else(|| url.to_string()),
        Err(_) => url.to_string(),
    }
}

/// Normalize an already parsed URL
///
/// Returns `None` for URLs without a tuple origin (`data:`, `file:`), which
/// callers treat as "leave unchanged".
#[must_use]
pub fn normalize_url(url: &Url) -> Option<String> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }

    let kept = kept_pairs(url);
    if kept
        .iter()
        .any(|(key, _)| SIZE_PARAMS.contains(&key.as_str()))
    {
        return Some(format!("{}{}", origin.ascii_serialization(), url.path()));
    }

    Some(with_query(url, kept))
}

/// Remove cache-busting parameters only, keeping size parameters intact
///
/// Identity for exact-duplicate detection: `a.jpg?w=100&v=2` equals
/// `a.jpg?w=100` but not `a.jpg?w=1200`.
#[must_use]
pub fn strip_cache_busting_url(url: &Url) -> Option<String> {
    if !url.origin().is_tuple() {
        return None;
    }
    Some(with_query(url, kept_pairs(url)))
}

fn kept_pairs(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(key, _)| !CACHE_BUSTING_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

fn with_query(url: &Url, pairs: Vec<(String, String)>) -> String {
    let mut rebuilt = url.clone();
    if pairs.is_empty() {
        rebuilt.set_query(None);
    } else {
        rebuilt.query_pairs_mut().clear().extend_pairs(pairs);
    }
    rebuilt.to_string()
}

/// Derive the content-hash key used to collapse resolution variants
///
/// `origin + directory + base-name-without-size-suffix + "." + extension`.
#[must_use]
pub fn content_hash(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => content_hash_url(&parsed).unwrap_or_else(|| url.to_string()),
        Err(_) => url.to_string(),
    }
}

/// Content-hash key for an already parsed URL
#[must_use]
pub fn content_hash_url(url: &Url) -> Option<String> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }

    let path = url.path();
    let (directory, filename) = match path.rfind('/') {
        Some(idx) => path.split_at(idx.checked_add(1)?),
        None => ("", path),
    };

    let (base, extension) = match filename.rfind('.') {
        Some(idx) if idx > 0 => (filename.get(..idx)?, filename.get(idx.checked_add(1)?..)),
        _ => (filename, None),
    };

    let cleaned = SIZE_SUFFIX.replace(base, "");

    let mut key = format!("{}{}{}", origin.ascii_serialization(), directory, cleaned);
    if let Some(ext) = extension {
        key.push('.');
        key.push_str(ext);
    }
    Some(key)
}
