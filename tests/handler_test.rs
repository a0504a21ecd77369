//! Credit and history contracts of `ScrapeHandler`

mod common;

use common::{create_test_html, mock_page};
use imagegrabber::{
    CreditLedger, DedupStrategy, GrabConfig, HandlerError, ImageExtractor, InMemoryHistory,
    InMemoryLedger, ScrapeHandler,
};

/// Reports a positive balance but loses every deduction, as when a
/// concurrent scrape spent the last credit in between
struct DrainedLedger;

impl CreditLedger for DrainedLedger {
    async fn balance(&self, _user_id: &str) -> Result<u64, HandlerError> {
        Ok(1)
    }

    async fn deduct(&self, user_id: &str, _amount: u64) -> Result<(), HandlerError> {
        Err(HandlerError::Ledger(format!("{user_id} has no credits left")))
    }
}

fn extractor() -> ImageExtractor {
    let config = GrabConfig::builder()
        .resolve_metadata(false)
        .dedup_strategy(DedupStrategy::FirstDiscovered)
        .build()
        .expect("valid");
    ImageExtractor::new(config).expect("client should build")
}

fn handler(ledger: InMemoryLedger, history: InMemoryHistory) -> ScrapeHandler<InMemoryLedger, InMemoryHistory> {
    ScrapeHandler::new(extractor(), ledger, history)
}

#[tokio::test]
async fn charges_one_credit_when_images_are_found() {
    let mut server = mockito::Server::new_async().await;
    let html = create_test_html(r#"<img src="/a.jpg"><img src="/b.png">"#);
    let _page = mock_page(&mut server, "/gallery", &html).await;
    let page_url = format!("{}/gallery", server.url());

    let ledger = InMemoryLedger::new();
    ledger.grant("alice", 3);
    let history = InMemoryHistory::new();
    let handler = handler(ledger, history);

    let outcome = handler.handle("alice", &page_url).await.expect("scrape succeeds");

    assert_eq!(outcome.images.len(), 2);
    assert_eq!(outcome.credits_charged, 1);
    assert_eq!(handler.ledger().credits("alice"), 2);

    let records = handler.history().records_for("alice");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, page_url);
    assert_eq!(records[0].images, outcome.images);
}

#[tokio::test]
async fn empty_result_is_free_but_still_recorded() {
    let mut server = mockito::Server::new_async().await;
    let _page = mock_page(&mut server, "/plain", &create_test_html("<p>Nothing here</p>")).await;
    let page_url = format!("{}/plain", server.url());

    let ledger = InMemoryLedger::new();
    ledger.grant("bob", 1);
    let handler = handler(ledger, InMemoryHistory::new());

    let outcome = handler.handle("bob", &page_url).await.expect("scrape succeeds");

    assert!(outcome.images.is_empty());
    assert_eq!(outcome.credits_charged, 0);
    assert_eq!(handler.ledger().credits("bob"), 1);
    assert_eq!(handler.history().records_for("bob").len(), 1);
}

#[tokio::test]
async fn zero_balance_is_rejected_before_fetching() {
    let mut server = mockito::Server::new_async().await;
    let page = server
        .mock("GET", "/gallery")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let ledger = InMemoryLedger::new();
    ledger.grant("carol", 0);
    let handler = handler(ledger, InMemoryHistory::new());

    let err = handler
        .handle("carol", &format!("{}/gallery", server.url()))
        .await
        .expect_err("no credits left");

    assert!(matches!(err, HandlerError::InsufficientCredits { .. }));
    assert_eq!(err.status_code().as_u16(), 402);
    assert!(handler.history().records_for("carol").is_empty());
    page.assert_async().await;
}

#[tokio::test]
async fn failed_fetch_charges_and_records_nothing() {
    let mut server = mockito::Server::new_async().await;
    let _page = server
        .mock("GET", "/down")
        .with_status(503)
        .create_async()
        .await;

    let ledger = InMemoryLedger::new();
    ledger.grant("dave", 5);
    let handler = handler(ledger, InMemoryHistory::new());

    let err = handler
        .handle("dave", &format!("{}/down", server.url()))
        .await
        .expect_err("503 aborts the scrape");

    assert!(matches!(err, HandlerError::Extract(_)));
    assert_eq!(err.status_code().as_u16(), 502);
    assert_eq!(handler.ledger().credits("dave"), 5);
    assert!(handler.history().records_for("dave").is_empty());
}

#[tokio::test]
async fn lost_charge_still_keeps_the_result_in_history() {
    let mut server = mockito::Server::new_async().await;
    let _page = mock_page(&mut server, "/gallery", &create_test_html(r#"<img src="/a.jpg">"#)).await;
    let page_url = format!("{}/gallery", server.url());

    let handler = ScrapeHandler::new(extractor(), DrainedLedger, InMemoryHistory::new());

    let err = handler
        .handle("erin", &page_url)
        .await
        .expect_err("deduction fails");

    assert!(matches!(err, HandlerError::Ledger(_)));
    let records = handler.history().records_for("erin");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, page_url);
    assert_eq!(records[0].images.len(), 1);
}
