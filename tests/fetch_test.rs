//! End-to-end tests driving the fetch coordination layer over HTTP.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bayut_client::{
    BayutClient, DEFAULT_PAGE_SIZE, FilterCoordinator, FilterSet, PagedFetcher, PageSource,
    PropertySummary, Purpose,
};

fn hits(count: usize, base: u64) -> serde_json::Value {
    let hits: Vec<_> = (0..count as u64)
        .map(|i| {
            json!({
                "id": base + i,
                "title": format!("Listing {}", base + i),
                "price": 80000.0 + i as f64
            })
        })
        .collect();
    json!({ "hits": hits })
}

async fn test_client(server: &MockServer) -> BayutClient {
    BayutClient::new("test-key")
        .unwrap()
        .with_base_urls(server.uri(), server.uri())
}

#[tokio::test]
async fn test_paginated_search_until_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/list"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(30, 0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/properties/list"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(12, 30)))
        .expect(1)
        .mount(&server)
        .await;

    let source: Arc<dyn PageSource<FilterSet, PropertySummary>> =
        Arc::new(test_client(&server).await);
    let fetcher = PagedFetcher::new(source, FilterSet::default(), DEFAULT_PAGE_SIZE);

    assert!(fetcher.load_next_page().await);
    assert!(fetcher.snapshot().has_more);

    assert!(fetcher.load_next_page().await);
    let snapshot = fetcher.snapshot();
    assert_eq!(snapshot.items.len(), 42);
    assert!(!snapshot.has_more);

    // Exhausted: no third request is made (mock expectations verify).
    assert!(!fetcher.load_next_page().await);
}

#[tokio::test]
async fn test_coordinator_skips_redundant_refetch_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/list"))
        .and(query_param("purpose", "for-rent"))
        .and(query_param("roomsMin", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(30, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = FilterCoordinator::new(
        Arc::new(test_client(&server).await),
        FilterSet::default(),
    );

    let filters = FilterSet {
        purpose: Some(Purpose::ForRent),
        rooms_min: Some(2),
        ..Default::default()
    };
    coordinator.apply_filters(filters.clone()).await;
    coordinator.apply_filters(filters).await;

    assert_eq!(coordinator.snapshot().items.len(), 30);
}

#[tokio::test]
async fn test_filter_change_discards_previous_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/list"))
        .and(query_param("purpose", "for-sale"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(30, 0)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/properties/list"))
        .and(query_param("purpose", "for-rent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(5, 1000)))
        .mount(&server)
        .await;

    let coordinator = FilterCoordinator::new(
        Arc::new(test_client(&server).await),
        FilterSet::default(),
    );

    coordinator
        .apply_filters(FilterSet {
            purpose: Some(Purpose::ForSale),
            ..Default::default()
        })
        .await;
    assert_eq!(coordinator.snapshot().items.len(), 30);

    coordinator
        .apply_filters(FilterSet {
            purpose: Some(Purpose::ForRent),
            ..Default::default()
        })
        .await;

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.items.len(), 5);
    assert!(snapshot.items.iter().all(|p| p.id >= 1000));
    assert!(!snapshot.has_more);
}

#[tokio::test]
async fn test_failed_page_leaves_list_intact_and_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/properties/list"))
        .and(query_param("page", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(30, 0)))
        .mount(&server)
        .await;
    // First attempt at page 1 fails, the retry succeeds.
    Mock::given(method("GET"))
        .and(path("/properties/list"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/properties/list"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(10, 30)))
        .mount(&server)
        .await;

    let source: Arc<dyn PageSource<FilterSet, PropertySummary>> =
        Arc::new(test_client(&server).await);
    let fetcher = PagedFetcher::new(source, FilterSet::default(), DEFAULT_PAGE_SIZE);

    assert!(fetcher.load_next_page().await);
    assert!(!fetcher.load_next_page().await);

    let snapshot = fetcher.snapshot();
    assert!(snapshot.failed);
    assert_eq!(snapshot.items.len(), 30);
    assert!(snapshot.has_more);

    // Caller-initiated retry of the same page.
    assert!(fetcher.load_next_page().await);
    assert_eq!(fetcher.snapshot().items.len(), 40);
    assert!(!fetcher.snapshot().has_more);
}
