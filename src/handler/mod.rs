//! Scrape request handling around the extraction engine
//!
//! The engine itself knows nothing about users or billing. `ScrapeHandler`
//! wraps it with the two contracts a hosted deployment needs:
//! a credit check before extraction with a one-credit charge only when
//! images were found, and persistence of every result as a history record.

pub mod memory;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::extraction::{ExtractError, ImageExtractor, ResolvedImage};

pub use memory::{InMemoryHistory, InMemoryLedger};

/// Credits charged for a scrape that found at least one image
pub const SCRAPE_COST: u64 = 1;

/// Errors surfaced by `ScrapeHandler`
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("User {user_id} has no credits left")]
    InsufficientCredits { user_id: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Credit ledger error: {0}")]
    Ledger(String),

    #[error("History store error: {0}")]
    History(String),
}

impl HandlerError {
    /// HTTP status a web layer should surface for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::InsufficientCredits { .. } => StatusCode::PAYMENT_REQUIRED,
            HandlerError::Extract(e) => e.status_code(),
            HandlerError::Ledger(_) | HandlerError::History(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// One persisted scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub user_id: String,
    pub url: String,
    pub images: Vec<ResolvedImage>,
}

/// Result of a handled scrape request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub images: Vec<ResolvedImage>,
    pub credits_charged: u64,
}

/// Credit balance and deduction
///
/// The balance check and the deduction are separate calls, so concurrent
/// scrapes for one user can both pass the check. `deduct` must therefore be
/// atomic on its own and fail instead of taking a balance below zero.
pub trait CreditLedger: Send + Sync {
    fn balance(&self, user_id: &str) -> impl Future<Output = Result<u64, HandlerError>> + Send;

    fn deduct(
        &self,
        user_id: &str,
        amount: u64,
    ) -> impl Future<Output = Result<(), HandlerError>> + Send;
}

/// Storage for scrape results
pub trait HistoryStore: Send + Sync {
    fn save(&self, record: HistoryRecord) -> impl Future<Output = Result<(), HandlerError>> + Send;
}

/// Credit-gated, history-recording front door to `ImageExtractor`
#[derive(Debug, Clone)]
pub struct ScrapeHandler<L, H> {
    extractor: ImageExtractor,
    ledger: L,
    history: H,
}

impl<L: CreditLedger, H: HistoryStore> ScrapeHandler<L, H> {
    #[must_use]
    pub fn new(extractor: ImageExtractor, ledger: L, history: H) -> Self {
        Self {
            extractor,
            ledger,
            history,
        }
    }

    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    #[must_use]
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Scrape `page_url` on behalf of `user_id`
    ///
    /// Requires a positive balance up front, persists the result, then
    /// charges `SCRAPE_COST` only when the image list is non-empty. A charge
    /// lost to a concurrent scrape surfaces as `Ledger` with the result
    /// already in history.
    ///
    /// # Errors
    ///
    /// `InsufficientCredits` before any network traffic, `Extract` when the
    /// page cannot be fetched (nothing is charged or stored), or the
    /// collaborators' own errors.
    pub async fn handle(&self, user_id: &str, page_url: &str) -> Result<ScrapeOutcome, HandlerError> {
        if self.ledger.balance(user_id).await? == 0 {
            return Err(HandlerError::InsufficientCredits {
                user_id: user_id.to_string(),
            });
        }

        let images = self.extractor.extract(page_url).await?;

        self.history
            .save(HistoryRecord {
                user_id: user_id.to_string(),
                url: page_url.to_string(),
                images: images.clone(),
            })
            .await?;

        let credits_charged = if images.is_empty() {
            log::debug!("No images on {page_url}; nothing charged to {user_id}");
            0
        } else {
            self.ledger
                .deduct(user_id, SCRAPE_COST)
                .await
                .inspect_err(|e| log::warn!("Charge for {page_url} failed after saving: {e}"))?;
            SCRAPE_COST
        };

        Ok(ScrapeOutcome {
            images,
            credits_charged,
        })
    }
}
