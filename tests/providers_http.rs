// tests/providers_http.rs
// Listing and feed providers against a local axum server.

use axum::{http::StatusCode, routing::get, Router};

use paper_alert::ingest::collect_candidates;
use paper_alert::ingest::providers::{FeedProvider, ListingProvider, ListingSelectors};
use paper_alert::ingest::types::SourceProvider;

const ARXIV_XML: &str = include_str!("fixtures/arxiv_rss.xml");
const HF_HTML: &str = include_str!("fixtures/hf_papers.html");

async fn spawn_sources() -> String {
    let app = Router::new()
        .route("/feed/ok", get(|| async { ARXIV_XML }))
        .route("/feed/down", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }))
        .route("/papers/ok", get(|| async { HF_HTML }))
        .route("/papers/gone", get(|| async { (StatusCode::NOT_FOUND, "gone") }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// An address nothing listens on: bind, read the port, drop the listener.
fn refused_url() -> String {
    let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = l.local_addr().unwrap();
    drop(l);
    format!("http://{addr}/feed")
}

#[tokio::test]
async fn http_sources_parse_when_healthy() {
    let base = spawn_sources().await;
    let client = reqwest::Client::new();

    let feed = FeedProvider::from_url(format!("{base}/feed/ok"), client.clone());
    assert_eq!(feed.fetch_latest().await.unwrap().len(), 3);

    let listing = ListingProvider::from_url(
        format!("{base}/papers/ok"),
        ListingSelectors::default(),
        client,
    );
    let items = listing.fetch_latest().await.unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].link, format!("{base}/papers/2501.10001"));
}

#[tokio::test]
async fn non_2xx_and_refused_sources_are_errors() {
    let base = spawn_sources().await;
    let client = reqwest::Client::new();

    let down = FeedProvider::from_url(format!("{base}/feed/down"), client.clone());
    let err = format!("{:#}", down.fetch_latest().await.unwrap_err());
    assert!(err.contains("500"), "error was: {err}");

    let gone = ListingProvider::from_url(
        format!("{base}/papers/gone"),
        ListingSelectors::default(),
        client.clone(),
    );
    let err = format!("{:#}", gone.fetch_latest().await.unwrap_err());
    assert!(err.contains("404"), "error was: {err}");

    let refused = FeedProvider::from_url(refused_url(), client);
    assert!(refused.fetch_latest().await.is_err());
}

#[tokio::test]
async fn failing_urls_yield_nothing_and_healthy_feed_survives() {
    let base = spawn_sources().await;
    let client = reqwest::Client::new();

    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(ListingProvider::from_url(
            format!("{base}/papers/gone"),
            ListingSelectors::default(),
            client.clone(),
        )),
        Box::new(FeedProvider::from_url(format!("{base}/feed/down"), client.clone())),
        Box::new(FeedProvider::from_url(refused_url(), client.clone())),
        Box::new(FeedProvider::from_url(format!("{base}/feed/ok"), client)),
    ];

    let items = collect_candidates(&providers).await;
    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Sparse Attention for Remote Sensing Imagery",
            "Bandits With Knapsacks Revisited",
            "Few-Shot Learning for Rare Species",
        ]
    );
}
