//! Image metadata resolution
//!
//! Byte size and MIME type from HEAD, dimensions from header sniffing, and
//! the quality tier derived from both.

pub mod quality;
pub mod resolver;

pub use quality::Quality;
pub use resolver::{ImageMetadata, MetadataResolver};
