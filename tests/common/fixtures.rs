//! Shared request and record builders.

use std::time::Duration;

use dinescout::{LocationData, PipelineConfig, RawCandidateRecord, SearchRequest};
use serde_json::json;

pub fn tokyo() -> LocationData {
    LocationData::from_coordinates(35.6762, 139.6503).with_city("Tokyo")
}

pub fn osaka() -> LocationData {
    LocationData::from_coordinates(34.6937, 135.5023).with_city("Osaka")
}

pub fn request(query: &str, location: LocationData) -> SearchRequest {
    SearchRequest::new(query, location)
}

pub fn search_body(query: &str) -> serde_json::Value {
    json!({
        "query": query,
        "location": {"latitude": 35.6762, "longitude": 139.6503, "city": "Tokyo"}
    })
}

pub fn record(name: &str, cuisine: &str, rating: f64, reviews: u64) -> RawCandidateRecord {
    RawCandidateRecord::new(record_json(name, cuisine, rating, reviews))
}

pub fn record_json(name: &str, cuisine: &str, rating: f64, reviews: u64) -> serde_json::Value {
    json!({
        "name": name,
        "cuisine": cuisine,
        "address": format!("{} Building, Shibuya, Tokyo", name),
        "rating": rating,
        "reviewCount": reviews,
        "priceLevel": 3,
        "phone": "+81 3-1234-5678",
        "website": "https://example.jp",
        "latitude": 35.6595,
        "longitude": 139.7005,
    })
}

pub fn sushi_records() -> Vec<RawCandidateRecord> {
    vec![
        record("Sushi Zen", "Japanese", 4.7, 120),
        record("Ginza Kyubey", "Sushi", 4.5, 300),
        record("Tsukiji Tamazushi", "Japanese", 4.1, 80),
    ]
}

/// Fast retries and a fixed fallback seed.
pub fn fast_config() -> PipelineConfig {
    PipelineConfig {
        retry_backoff: Duration::from_millis(1),
        fallback_seed: Some(7),
        ..Default::default()
    }
}
