//! HTTP provider against a stubbed knowledge-search endpoint.

mod common;

use std::sync::Arc;
use std::time::Duration;

use dinescout::{
    Coordinates, ErrorKind, HttpSearchProvider, LocationHint, PipelineConfig, SearchCache,
    SearchPipeline, SearchProvider, SearchStatus, classify,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::fixtures::{fast_config, record_json, request, tokyo};

fn hint() -> LocationHint {
    LocationHint {
        label: "Tokyo".to_string(),
        coordinates: Some(Coordinates::new(35.6762, 139.6503)),
        radius_miles: 10.0,
    }
}

fn provider(server: &MockServer) -> HttpSearchProvider {
    HttpSearchProvider::new(format!("{}/search", server.uri()), Duration::from_secs(2)).unwrap()
}

fn pipeline(provider: HttpSearchProvider, config: PipelineConfig) -> SearchPipeline {
    let cache = Arc::new(SearchCache::new(100, config.cache_ttl));
    SearchPipeline::new(Arc::new(provider), cache, config)
}

#[tokio::test]
async fn test_bare_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "query": "sushi",
            "location": {"label": "Tokyo", "radiusMiles": 10.0}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            record_json("Sushi Zen", "Japanese", 4.7, 120),
            record_json("Ginza Kyubey", "Sushi", 4.5, 300),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = provider(&server).search("sushi", &hint()).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].text(&["name"]).as_deref(), Some("Sushi Zen"));
}

#[tokio::test]
async fn test_wrapped_restaurants_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "restaurants": [record_json("Sushi Zen", "Japanese", 4.7, 120)],
            "source": "kb"
        })))
        .mount(&server)
        .await;

    let records = provider(&server).search("sushi", &hint()).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_status_codes_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = provider(&server);

    let err = provider.search("sushi", &hint()).await.unwrap_err();
    assert_eq!(err.status, Some(429));
    assert!(err.message.contains("slow down"));
    assert_eq!(classify(&err), ErrorKind::ApiLimit);

    let err = provider.search("sushi", &hint()).await.unwrap_err();
    assert_eq!(err.status, Some(503));
    assert_eq!(classify(&err), ErrorKind::Network);
}

#[tokio::test]
async fn test_non_json_body_is_a_validation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).search("sushi", &hint()).await.unwrap_err();
    assert!(err.status.is_none());
    assert_eq!(classify(&err), ErrorKind::Validation);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/search", listener.local_addr().unwrap());
    drop(listener);

    let provider = HttpSearchProvider::new(url, Duration::from_secs(2)).unwrap();
    let err = provider.search("sushi", &hint()).await.unwrap_err();
    assert_eq!(classify(&err), ErrorKind::Network);
}

#[tokio::test]
async fn test_pipeline_over_http_caches_live_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            record_json("Sushi Zen", "Japanese", 4.7, 120),
            {"cuisine": "Japanese", "address": "Tokyo"},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = pipeline(provider(&server), fast_config());

    let first = pipeline.search(&request("sushi", tokyo())).await.unwrap();
    assert_eq!(first.status, SearchStatus::Miss);
    assert_eq!(first.total_results, 1);
    assert_eq!(first.restaurants[0].name, "Sushi Zen");
    assert_eq!(first.search_metadata.quality_stats.rejected, 1);

    let second = pipeline.search(&request("sushi", tokyo())).await.unwrap();
    assert_eq!(second.status, SearchStatus::Hit);
}

#[tokio::test]
async fn test_slow_endpoint_times_out_then_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = PipelineConfig {
        provider_timeout: Duration::from_millis(50),
        max_attempts: 2,
        ..fast_config()
    };
    let pipeline = pipeline(provider(&server), config);

    let response = pipeline.search(&request("sushi", tokyo())).await.unwrap();
    assert_eq!(response.status, SearchStatus::Fallback);
    assert!(response.search_metadata.used_fallback);
    assert!(!response.restaurants.is_empty());

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
}
