//! Configuration module for image extraction
//!
//! This module provides the `GrabConfig` struct and its builder
//! with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::GrabConfigBuilder;
pub use types::{DedupStrategy, GrabConfig};
