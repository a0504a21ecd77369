//! Shared constants for imagegrabber
//!
//! Default values and fixed parameter lists used throughout the engine,
//! kept in one place to avoid magic numbers in the hot path.

use std::time::Duration;

/// Chrome user agent string sent with every request
///
/// Many image CDNs serve placeholders or 403s to non-browser agents, so
/// the page fetch, HEAD and sniff GET all present as desktop Chrome.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Default timeout for the page fetch
pub const DEFAULT_PAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for a single image HEAD request
pub const DEFAULT_HEAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for a single image GET used for header sniffing
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default TCP/TLS connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum page body size: 10MB
///
/// Larger bodies abort the extraction with `ExtractError::Body`.
pub const DEFAULT_MAX_PAGE_BYTES: usize = 10 * 1024 * 1024;

/// Maximum image body size read for sniffing: 15MB
///
/// Bodies past this limit are abandoned and the image keeps no dimensions.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 15 * 1024 * 1024;

/// Default number of images resolved concurrently per extraction
pub const DEFAULT_MAX_CONCURRENT_RESOLUTIONS: usize = 8;

/// Default number of concurrent metadata fetches against a single host
pub const DEFAULT_MAX_CONCURRENT_PER_HOST: usize = 4;

/// Upper bound accepted for `max_concurrent_resolutions`
pub const MAX_CONCURRENT_RESOLUTIONS_LIMIT: usize = 64;

/// Upper bound accepted for `max_concurrent_per_host`
pub const MAX_CONCURRENT_PER_HOST_LIMIT: usize = 16;

/// Filename used when a URL has no usable last path segment
pub const DEFAULT_FILENAME: &str = "image.jpg";

/// Width above which an already-resolved variant is considered good enough
/// and later variants of the same content hash are skipped.
pub const GOOD_ENOUGH_WIDTH: u32 = 250;

/// Candidate strings shorter than this are discarded before resolution
pub const MIN_CANDIDATE_LEN: usize = 4;

/// Query parameters that only bust caches or track clicks
pub const CACHE_BUSTING_PARAMS: &[&str] = &["t", "v", "cache", "timestamp", "_", "cb", "bust"];

/// Query parameters that ask a CDN for a resized rendition
pub const SIZE_PARAMS: &[&str] = &["w", "width", "h", "height", "s", "size", "resize"];
