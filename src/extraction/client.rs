//! HTTP client construction and the page fetch

use futures::StreamExt;
use reqwest::Client;
use reqwest::header::ACCEPT;
use url::Url;

use super::types::{ExtractError, ExtractResult};
use crate::config::GrabConfig;

const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Build the shared client used for the page fetch and all metadata requests
///
/// Per-request timeouts are applied at each call site; the client carries
/// only the connect timeout and user agent.
///
/// # Errors
///
/// Returns `ExtractError::Client` if the TLS backend fails to initialise.
pub fn build_client(config: &GrabConfig) -> ExtractResult<Client> {
    Client::builder()
        .user_agent(config.user_agent())
        .connect_timeout(config.connect_timeout())
        .build()
        .map_err(ExtractError::Client)
}

/// Fetch a page body as text
///
/// Any network error, timeout, non-2xx status or oversized body is fatal.
///
/// # Errors
///
/// Returns `Fetch`, `HttpStatus`, `Body` or `BodyTooLarge`.
pub async fn fetch_page(client: &Client, url: &Url, config: &GrabConfig) -> ExtractResult<String> {
    let max_bytes = config.max_page_bytes();

    let response = client
        .get(url.as_str())
        .timeout(config.page_timeout())
        .header(ACCEPT, PAGE_ACCEPT)
        .send()
        .await
        .map_err(|source| ExtractError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let expected_size = response.content_length().unwrap_or(0);
    if expected_size > max_bytes as u64 {
        return Err(ExtractError::BodyTooLarge {
            url: url.to_string(),
            limit: max_bytes,
        });
    }

    let mut buffer = Vec::with_capacity(usize::try_from(expected_size).unwrap_or(0));
    let mut stream = response.bytes_stream();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|source| ExtractError::Body {
            url: url.to_string(),
            source,
        })?;

        if buffer.len().saturating_add(chunk.len()) > max_bytes {
            return Err(ExtractError::BodyTooLarge {
                url: url.to_string(),
                limit: max_bytes,
            });
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
