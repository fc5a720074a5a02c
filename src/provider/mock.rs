//! Scripted in-memory provider for tests and demo mode.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{LocationHint, ProviderError, SearchProvider};
use crate::parser::RawCandidateRecord;

type MockOutcome = Result<Vec<RawCandidateRecord>, ProviderError>;

/// Replays scripted outcomes in order, then repeats a default outcome.
///
/// In demo mode the default outcome is generated from the query and location instead.
pub struct MockSearchProvider {
    script: Mutex<VecDeque<MockOutcome>>,
    default: MockOutcome,
    demo: bool,
    latency: Option<Duration>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockSearchProvider {
    /// A provider that returns no records unless scripted.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: Ok(Vec::new()),
            demo: false,
            latency: None,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Always returns `records` (after any scripted outcomes).
    pub fn with_records(records: Vec<RawCandidateRecord>) -> Self {
        Self {
            default: Ok(records),
            ..Self::new()
        }
    }

    /// Always fails with `error` (after any scripted outcomes).
    pub fn failing(error: ProviderError) -> Self {
        Self {
            default: Err(error),
            ..Self::new()
        }
    }

    /// Generates a handful of plausible records per query; used by `DINESCOUT_MOCK_PROVIDER`.
    pub fn demo() -> Self {
        Self {
            demo: true,
            ..Self::new()
        }
    }

    /// Sleeps this long before answering each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queues a successful outcome.
    pub fn push_records(&self, records: Vec<RawCandidateRecord>) {
        self.script.lock().push_back(Ok(records));
    }

    /// Queues a failure.
    pub fn push_error(&self, error: ProviderError) {
        self.script.lock().push_back(Err(error));
    }

    /// Number of `search` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Query texts received, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

impl Default for MockSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockSearchProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSearchProvider")
            .field("scripted", &self.script.lock().len())
            .field("demo", &self.demo)
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(
        &self,
        query: &str,
        location: &LocationHint,
    ) -> Result<Vec<RawCandidateRecord>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().push(query.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(outcome) = self.script.lock().pop_front() {
            return outcome;
        }

        if self.demo {
            return Ok(demo_records(query, location));
        }

        self.default.clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

const DEMO_VENUES: &[(&str, &str, f64, u64, u8)] = &[
    ("Golden Lantern", "Chinese", 4.4, 312, 2),
    ("Casa Verde", "Mexican", 4.2, 198, 2),
    ("Trattoria Sole", "Italian", 4.6, 421, 3),
    ("Hanami Sushi Bar", "Japanese", 4.7, 256, 3),
    ("Spice Route", "Indian", 4.3, 174, 2),
];

fn demo_records(query: &str, location: &LocationHint) -> Vec<RawCandidateRecord> {
    let place = location
        .label
        .split(',')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("Downtown")
        .to_string();

    DEMO_VENUES
        .iter()
        .enumerate()
        .map(|(i, (name, cuisine, rating, reviews, price))| {
            let mut record = serde_json::json!({
                "name": name,
                "cuisine": cuisine,
                "address": format!("{} Market Street, {}", 100 + i * 20, place),
                "rating": rating,
                "reviewCount": reviews,
                "priceLevel": price,
                "description": format!("Popular {} spot matching \"{}\".", cuisine.to_lowercase(), query),
            });
            if let Some(origin) = location.coordinates {
                let offset = 0.004 * (i as f64 + 1.0);
                record["coordinates"] = serde_json::json!({
                    "latitude": origin.latitude + offset,
                    "longitude": origin.longitude - offset,
                });
            }
            RawCandidateRecord::new(record)
        })
        .collect()
}
