//! Test utilities shared by the imagegrabber integration tests

use imagegrabber::{DedupStrategy, GrabConfig, ImageExtractor};
use mockito::{Matcher, Mock, ServerGuard};
use std::time::Duration;

/// Wraps body markup in a minimal HTML document
#[allow(dead_code)]
pub fn create_test_html(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Gallery</title>
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// Minimal PNG: signature + IHDR with the given dimensions
#[allow(dead_code)]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0, 0, 0, 0, 0]);
    bytes
}

/// Minimal baseline JPEG: SOI, APP0, SOF0 with the given dimensions, EOI
#[allow(dead_code)]
pub fn jpeg_bytes(width: u16, height: u16) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    bytes.extend_from_slice(b"JFIF\0");
    bytes.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

/// Extractor with short timeouts suitable for a local mock server
#[allow(dead_code)]
pub fn test_extractor(strategy: DedupStrategy) -> ImageExtractor {
    let config = GrabConfig::builder()
        .request_timeout(Duration::from_secs(5))
        .dedup_strategy(strategy)
        .build()
        .expect("test config should validate");
    ImageExtractor::new(config).expect("client should build")
}

/// Serves `html` at `path`
#[allow(dead_code)]
pub async fn mock_page(server: &mut ServerGuard, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Serves an image at `path` for both HEAD and GET
#[allow(dead_code)]
pub async fn mock_image(
    server: &mut ServerGuard,
    path: &str,
    content_type: &str,
    bytes: &[u8],
) -> (Mock, Mock) {
    let head = server
        .mock("HEAD", path)
        .with_status(200)
        .with_header("content-type", content_type)
        .with_header("content-length", &bytes.len().to_string())
        .with_body(bytes)
        .create_async()
        .await;
    let get = server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", content_type)
        .with_body(bytes)
        .create_async()
        .await;
    (head, get)
}

/// Serves an image at `path` for both HEAD and GET, only for the given query
#[allow(dead_code)]
pub async fn mock_image_with_query(
    server: &mut ServerGuard,
    path: &str,
    query: Matcher,
    content_type: &str,
    bytes: &[u8],
) -> (Mock, Mock) {
    let head = server
        .mock("HEAD", path)
        .match_query(query.clone())
        .with_status(200)
        .with_header("content-type", content_type)
        .with_header("content-length", &bytes.len().to_string())
        .with_body(bytes)
        .create_async()
        .await;
    let get = server
        .mock("GET", path)
        .match_query(query)
        .with_status(200)
        .with_header("content-type", content_type)
        .with_body(bytes)
        .create_async()
        .await;
    (head, get)
}
