//! End-to-end HTTP tests.

mod common;

use dinescout::{DINESCOUT_STATUS_READY, MockSearchProvider, PipelineConfig, ProviderError};

use common::fixtures::{fast_config, search_body};
use common::harness::{TestServerConfig, spawn_test_server};
use common::http_client::TestClient;

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let client = TestClient::new(server.url());
    let health = client.health().await.expect("Health check should succeed");

    assert_eq!(health.status, "ok");
}

#[tokio::test]
async fn test_ready_endpoint_indicates_components() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let client = TestClient::new(server.url());
    let ready = client.ready().await.expect("Ready check should succeed");

    assert!(ready.is_ok(), "Server should report ready");
    assert_eq!(ready.components.http, DINESCOUT_STATUS_READY);
    assert_eq!(ready.components.cache, DINESCOUT_STATUS_READY);
    assert_eq!(ready.components.provider, "mock");
    assert_eq!(ready.components.fallback, "enabled");
}

#[tokio::test]
async fn test_search_miss_then_hit() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let first = client.search(&search_body("sushi")).await.unwrap();
    assert_eq!(first.code, 200);
    assert_eq!(first.status, "MISS");
    assert_eq!(first.body["totalResults"], 3);
    assert_eq!(first.body["cached"], false);
    assert_eq!(first.body["searchMetadata"]["usedFallback"], false);

    let second = client.search(&search_body("Sushi ")).await.unwrap();
    assert_eq!(second.status, "HIT");
    assert_eq!(second.body["cached"], true);
    assert_eq!(
        second.body["restaurants"][0]["id"],
        first.body["restaurants"][0]["id"]
    );
    assert_eq!(server.provider.call_count(), 1);
}

#[tokio::test]
async fn test_rate_limited_provider_serves_tagged_fallback() {
    let server = spawn_test_server(TestServerConfig::with_provider(
        MockSearchProvider::failing(ProviderError::with_status(429, "Too Many Requests")),
    ))
    .await
    .expect("Server should start");
    let client = TestClient::new(server.url());

    let reply = client.search(&search_body("ramen")).await.unwrap();

    assert_eq!(reply.code, 200);
    assert_eq!(reply.status, "FALLBACK");
    assert_eq!(reply.body["searchMetadata"]["usedFallback"], true);
    assert_eq!(reply.body["searchMetadata"]["fallbackStrategy"], "mock");

    let restaurants = reply.body["restaurants"].as_array().unwrap();
    assert!(!restaurants.is_empty());
    for restaurant in restaurants {
        assert_eq!(restaurant["provenance"]["source"], "fallback");
        assert!(restaurant["qualityScore"].as_u64().unwrap() >= 40);
    }
    assert_eq!(server.provider.call_count(), 1);
}

#[tokio::test]
async fn test_failure_without_fallback_is_structured() {
    let server = spawn_test_server(TestServerConfig {
        pipeline: PipelineConfig {
            fallback_enabled: false,
            ..fast_config()
        },
        ..TestServerConfig::with_provider(MockSearchProvider::failing(ProviderError::new(
            "network error: connection refused",
        )))
    })
    .await
    .expect("Server should start");
    let client = TestClient::new(server.url());

    let reply = client.search(&search_body("pizza")).await.unwrap();

    assert_eq!(reply.code, 503);
    assert_eq!(reply.status, "ERROR");
    assert_eq!(
        reply.body["error"],
        "We couldn't reach the restaurant search service."
    );
    assert_eq!(reply.body["canRetry"], true);
    assert!(reply.body["suggestions"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
async fn test_invalid_location_is_rejected() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    let reply = client
        .search(&serde_json::json!({
            "query": "sushi",
            "location": {"latitude": 123.0, "longitude": 10.0}
        }))
        .await
        .unwrap();

    assert_eq!(reply.code, 400);
    assert_eq!(reply.status, "ERROR");
    assert_eq!(server.provider.call_count(), 0);
}

#[tokio::test]
async fn test_cache_stats_reflect_traffic() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());

    for _ in 0..3 {
        client.search(&search_body("sushi")).await.unwrap();
    }
    client.search(&search_body("tempura")).await.unwrap();

    let stats = client.cache_stats().await.unwrap();
    assert_eq!(stats["cache"]["hits"], 2);
    assert_eq!(stats["cache"]["misses"], 2);
    assert_eq!(stats["cache"]["size"], 2);
    assert_eq!(stats["hitRate"], 0.5);
}

#[tokio::test]
async fn test_concurrent_requests() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let client = TestClient::new(server.url());
            tokio::spawn(async move {
                client
                    .search(&search_body(&format!("sushi spot {}", i)))
                    .await
            })
        })
        .collect();

    let results = futures::future::join_all(handles).await;

    for (i, result) in results.into_iter().enumerate() {
        let reply = result
            .expect("Task should not panic")
            .unwrap_or_else(|e| panic!("Request {} failed: {}", i, e));
        assert_eq!(reply.code, 200, "Request {} should succeed", i);
        assert_eq!(reply.status, "MISS");
    }
    assert_eq!(server.provider.call_count(), 10);
}

#[tokio::test]
async fn test_server_lifecycle() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let client = TestClient::new(server.url());
    let health = client.health().await;
    assert!(health.is_ok(), "Server should be healthy after startup");

    server.shutdown().await;

    let result = client.health().await;
    assert!(
        result.is_err(),
        "Server should reject connections after shutdown"
    );
}
