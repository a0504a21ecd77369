//! Per-image metadata resolution over HTTP
//!
//! A HEAD request supplies byte size and MIME type. JPEG and PNG images are
//! then fetched in full (up to `max_image_bytes`) and handed to the header
//! sniffer for dimensions. Nothing here returns an error: every failure
//! leaves the corresponding field unset and is logged at debug level.

use futures::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::quality::Quality;
use crate::config::GrabConfig;
use crate::sniff::{Dimensions, is_sniffable, sniff_dimensions};

const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

/// Metadata gathered for a single image URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub size: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mime_type: Option<String>,
    pub quality: Option<Quality>,
}

/// Resolves size, type, dimensions and quality for image URLs
#[derive(Debug, Clone)]
pub struct MetadataResolver {
    client: Client,
    config: Arc<GrabConfig>,
}

impl MetadataResolver {
    #[must_use]
    pub fn new(client: Client, config: Arc<GrabConfig>) -> Self {
        Self { client, config }
    }

    /// Resolve metadata for one absolute image URL
    ///
    /// Never fails; a partially or entirely empty result signals what could
    /// not be determined.
    pub async fn resolve(&self, url: &str) -> ImageMetadata {
        let mut metadata = ImageMetadata::default();

        if let Some((size, mime_type)) = self.head(url).await {
            metadata.size = size;
            metadata.mime_type = mime_type;
        }

        let sniff_type = metadata
            .mime_type
            .as_deref()
            .filter(|mime| is_sniffable(mime))
            .map(str::to_string);

        if let Some(mime) = sniff_type
            && let Some(body) = self.fetch_body(url).await
        {
            if metadata.size.is_none() {
                metadata.size = u64::try_from(body.len()).ok();
            }
            match sniff_dimensions(&body, &mime) {
                Some(Dimensions { width, height }) => {
                    metadata.width = Some(width);
                    metadata.height = Some(height);
                }
                None => log::debug!("No dimensions sniffed from {url} ({mime})"),
            }
        }

        if let (Some(size), Some(width), Some(height)) =
            (metadata.size, metadata.width, metadata.height)
        {
            metadata.quality = Quality::classify(size, width, height);
        }

        metadata
    }

    /// HEAD the image, returning `(Content-Length, Content-Type)`
    ///
    /// `Content-Length` is read from the header rather than the body size
    /// hint, which is always zero for HEAD responses.
    async fn head(&self, url: &str) -> Option<(Option<u64>, Option<String>)> {
        let response = match self
            .client
            .head(url)
            .timeout(self.config.head_timeout())
            .header(ACCEPT, IMAGE_ACCEPT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::debug!("HEAD {url} failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            log::debug!("HEAD {url} returned status {}", response.status());
            return None;
        }

        let headers = response.headers();
        let size = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let mime_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Some((size, mime_type))
    }

    /// GET the full image body, bounded by `max_image_bytes`
    async fn fetch_body(&self, url: &str) -> Option<Vec<u8>> {
        let max_bytes = self.config.max_image_bytes();

        let response = match self
            .client
            .get(url)
            .timeout(self.config.image_timeout())
            .header(ACCEPT, IMAGE_ACCEPT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::debug!("GET {url} failed: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            log::debug!("GET {url} returned status {}", response.status());
            return None;
        }

        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > max_bytes as u64 {
            log::debug!("Image {url} too large to sniff: {expected_size} bytes (max: {max_bytes})");
            return None;
        }

        let mut buffer = Vec::with_capacity(usize::try_from(expected_size).unwrap_or(0));
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(e) => {
                    log::debug!("Failed reading body of {url}: {e}");
                    return None;
                }
            };

            if buffer.len().saturating_add(chunk.len()) > max_bytes {
                log::debug!("Image {url} exceeded {max_bytes} bytes during download");
                return None;
            }
            buffer.extend_from_slice(&chunk);
        }

        Some(buffer)
    }
}
