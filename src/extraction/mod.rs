//! Image extraction
//!
//! The orchestrator composing harvest, dedup and metadata resolution, plus
//! the result and error types exposed to callers.

pub mod client;
pub mod dedup;
pub mod host_limiter;
pub mod orchestrator;
pub mod types;

pub use dedup::{DedupEntry, DedupIndex, Offer};
pub use host_limiter::HostLimiter;
pub use orchestrator::{ImageExtractor, discover};
pub use types::{ExtractError, ExtractResult, ResolvedImage};
