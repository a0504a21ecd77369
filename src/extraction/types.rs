//! Result and error types for image extraction

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::metadata::{ImageMetadata, Quality};
use crate::normalize::content_hash;
use crate::utils::{GOOD_ENOUGH_WIDTH, filename_from_url};

/// One discovered image, as returned to callers and persisted into history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImage {
    /// Absolute URL used to fetch the asset
    pub url: String,
    /// Last path segment of `url`, or `image.jpg`
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
}

impl ResolvedImage {
    /// Provisional image with no metadata
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self {
            url: url.to_string(),
            filename: filename_from_url(url),
            size: None,
            width: None,
            height: None,
            mime_type: None,
            quality: None,
        }
    }

    /// Copy resolved metadata onto this image, replacing any previous values
    #[must_use]
    pub fn with_metadata(mut self, metadata: ImageMetadata) -> Self {
        self.size = metadata.size;
        self.width = metadata.width;
        self.height = metadata.height;
        self.mime_type = metadata.mime_type;
        self.quality = metadata.quality;
        self
    }

    /// Whether the image is known to be wider than the good-enough threshold
    #[must_use]
    pub fn is_good_enough(&self) -> bool {
        self.width.is_some_and(|w| w > GOOD_ENOUGH_WIDTH)
    }

    /// Content-hash key of this image's URL
    #[must_use]
    pub fn content_hash(&self) -> String {
        content_hash(&self.url)
    }
}

/// Convenience alias for Result with `ExtractError`
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Fatal extraction failures
///
/// Only page-level problems end up here. Per-candidate and per-image
/// failures degrade silently and never abort an extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page URL did not parse or is not http(s)
    #[error("Invalid page URL '{url}': {reason}")]
    InvalidPageUrl { url: String, reason: String },

    /// Network failure or timeout while requesting the page
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page answered with a non-2xx status
    #[error("Fetching {url} returned HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },

    /// The page body could not be read to completion
    #[error("Failed to read page body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page body exceeded the configured limit
    #[error("Page {url} exceeded size limit of {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ExtractError {
    /// Whether the failure was a timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            ExtractError::Fetch { source, .. } | ExtractError::Body { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }

    /// HTTP status a web layer should surface for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractError::InvalidPageUrl { .. } => StatusCode::BAD_REQUEST,
            ExtractError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            e if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}
