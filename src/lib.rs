pub mod config;
pub mod extraction;
pub mod handler;
pub mod harvest;
pub mod metadata;
pub mod normalize;
pub mod sniff;
pub mod utils;

pub use config::{DedupStrategy, GrabConfig};
pub use extraction::{ExtractError, ExtractResult, ImageExtractor, ResolvedImage};
pub use handler::{
    CreditLedger, HandlerError, HistoryRecord, HistoryStore, InMemoryHistory, InMemoryLedger,
    ScrapeHandler, ScrapeOutcome,
};
pub use harvest::{Candidate, CandidateSource};
pub use metadata::{ImageMetadata, MetadataResolver, Quality};
pub use normalize::{content_hash, normalize};
pub use sniff::{Dimensions, sniff_dimensions};

/// Extract every image on `page_url` with the default configuration
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the page cannot
/// be fetched.
pub async fn extract(page_url: &str) -> ExtractResult<Vec<ResolvedImage>> {
    let extractor = ImageExtractor::new(GrabConfig::default())?;
    extractor.extract(page_url).await
}
