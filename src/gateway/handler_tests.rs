//! Router-level tests for the search gateway.

use std::sync::Arc;

use axum::{Router, body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::cache::{DINESCOUT_STATUS_HEADER, SearchCache};
use crate::gateway::create_router_with_state;
use crate::gateway::state::HandlerState;
use crate::parser::RawCandidateRecord;
use crate::pipeline::{PipelineConfig, SearchPipeline};
use crate::provider::{MockSearchProvider, ProviderError};

fn sushi_record() -> RawCandidateRecord {
    RawCandidateRecord::new(serde_json::json!({
        "name": "Sushi Zen",
        "cuisine": "Japanese",
        "address": "1-2-3 Ginza, Chuo City, Tokyo",
        "rating": 4.7,
        "reviewCount": 120,
        "priceLevel": 3,
        "website": "https://sushizen.example.jp",
    }))
}

fn search_body() -> serde_json::Value {
    serde_json::json!({
        "query": "sushi",
        "location": {"latitude": 35.6762, "longitude": 139.6503, "city": "Tokyo"}
    })
}

fn setup_state(provider: MockSearchProvider, config: PipelineConfig) -> HandlerState {
    let cache = Arc::new(SearchCache::new(100, config.cache_ttl));
    let pipeline = SearchPipeline::new(Arc::new(provider), cache, config);
    HandlerState::new(Arc::new(pipeline))
}

fn test_config() -> PipelineConfig {
    PipelineConfig {
        retry_backoff: std::time::Duration::from_millis(1),
        fallback_seed: Some(3),
        ..Default::default()
    }
}

async fn send_search(router: &Router, body: serde_json::Value) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/search")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn status_header(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(DINESCOUT_STATUS_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_search_miss_then_hit() {
    let state = setup_state(
        MockSearchProvider::with_records(vec![sushi_record()]),
        test_config(),
    );
    let router = create_router_with_state(state);

    let first = send_search(&router, search_body()).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(status_header(&first), "MISS");
    let first_json = body_json(first).await;
    assert_eq!(first_json["cached"], false);
    assert_eq!(first_json["totalResults"], 1);
    assert_eq!(first_json["restaurants"][0]["name"], "Sushi Zen");
    assert_eq!(first_json["searchParams"]["query"], "sushi");
    assert!(first_json["searchMetadata"]["requestId"].is_string());
    assert!(first_json.get("status").is_none());

    let second = send_search(&router, search_body()).await;
    assert_eq!(status_header(&second), "HIT");
    let second_json = body_json(second).await;
    assert_eq!(second_json["cached"], true);
    assert_eq!(
        second_json["restaurants"][0]["id"],
        first_json["restaurants"][0]["id"]
    );
}

#[tokio::test]
async fn test_search_fallback_header() {
    let state = setup_state(
        MockSearchProvider::failing(ProviderError::with_status(429, "rate limited")),
        test_config(),
    );
    let router = create_router_with_state(state);

    let response = send_search(&router, search_body()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(status_header(&response), "FALLBACK");

    let json = body_json(response).await;
    assert_eq!(json["searchMetadata"]["usedFallback"], true);
    assert_eq!(json["searchMetadata"]["fallbackStrategy"], "mock");
    assert_eq!(json["searchMetadata"]["confidence"], 0.6);
}

#[tokio::test]
async fn test_search_failure_is_service_unavailable() {
    let state = setup_state(
        MockSearchProvider::failing(ProviderError::with_status(429, "rate limited")),
        PipelineConfig {
            fallback_enabled: false,
            ..test_config()
        },
    );
    let router = create_router_with_state(state);

    let response = send_search(&router, search_body()).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(status_header(&response), "ERROR");

    let json = body_json(response).await;
    assert!(json["error"].is_string());
    assert_eq!(json["canRetry"], false);
    let suggestions = json["suggestions"].as_array().unwrap();
    assert!((2..=3).contains(&suggestions.len()));
}

#[tokio::test]
async fn test_missing_location_is_bad_request() {
    let state = setup_state(MockSearchProvider::new(), test_config());
    let router = create_router_with_state(state);

    let response = send_search(
        &router,
        serde_json::json!({"query": "sushi", "location": {}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(status_header(&response), "ERROR");

    let json = body_json(response).await;
    assert_eq!(json["code"], 400);
}

#[tokio::test]
async fn test_schema_mismatch_is_bad_request() {
    let state = setup_state(MockSearchProvider::new(), test_config());
    let router = create_router_with_state(state);

    let response = send_search(&router, serde_json::json!({"query": 42})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Invalid request schema")
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = create_router_with_state(setup_state(MockSearchProvider::new(), test_config()));

    let request = Request::builder()
        .method("GET")
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(status_header(&response), "healthy");
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_ready_endpoint_reports_draining() {
    let state = setup_state(MockSearchProvider::new(), test_config());
    let router = create_router_with_state(state.clone());

    let ready = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let response = router.clone().oneshot(ready).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["components"]["provider"], "mock");
    assert_eq!(json["components"]["fallback"], "enabled");

    state.begin_drain();
    let ready = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let response = router.oneshot(ready).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(status_header(&response), "not_ready");
}

#[tokio::test]
async fn test_cache_stats_endpoint() {
    let router = create_router_with_state(setup_state(
        MockSearchProvider::with_records(vec![sushi_record()]),
        test_config(),
    ));
    send_search(&router, search_body()).await;
    send_search(&router, search_body()).await;

    let request = Request::builder()
        .uri("/v1/cache/stats")
        .body(Body::empty())
        .unwrap();
    let json = body_json(router.oneshot(request).await.unwrap()).await;

    assert_eq!(json["cache"]["hits"], 1);
    assert_eq!(json["cache"]["misses"], 1);
    assert_eq!(json["cache"]["size"], 1);
    assert_eq!(json["cache"]["capacity"], 100);
    assert_eq!(json["hitRate"], 0.5);
    assert_eq!(json["provider"], "mock");
}
