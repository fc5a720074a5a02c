use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::SearchStatus;
use crate::constants::{
    DEFAULT_ACCEPTANCE_THRESHOLD, DEFAULT_CACHE_TTL_MINUTES, DEFAULT_ERROR_RATE_LIMIT,
    DEFAULT_ERROR_RATE_WINDOW, DEFAULT_FALLBACK_LANE_TTL_SECS, DEFAULT_FALLBACK_THRESHOLD,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_RESULTS, DEFAULT_PROVIDER_TIMEOUT_MS,
    DEFAULT_RETRY_BACKOFF_MS,
};
use crate::context::SearchRequest;
use crate::fallback::{FallbackStrategy, QualityTier};
use crate::parser::{CuisineMode, ParseStats, Restaurant};
use crate::validator::ValidationStats;

/// Settings the orchestrator needs, usually projected from [`crate::Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub cache_ttl: Duration,
    pub max_results: usize,
    pub provider_timeout: Duration,
    pub acceptance_threshold: u8,
    pub fallback_threshold: u8,
    pub max_attempts: u32,
    pub retry_backoff: Duration,
    pub error_rate_limit: usize,
    pub error_rate_window: Duration,
    pub fallback_enabled: bool,
    pub fallback_lane_ttl: Duration,
    pub fallback_tier: QualityTier,
    pub cuisine_mode: CuisineMode,
    /// Fixed seed for fallback synthesis; `None` draws from the OS.
    pub fallback_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_MINUTES * 60),
            max_results: DEFAULT_MAX_RESULTS,
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            error_rate_limit: DEFAULT_ERROR_RATE_LIMIT,
            error_rate_window: DEFAULT_ERROR_RATE_WINDOW,
            fallback_enabled: true,
            fallback_lane_ttl: Duration::from_secs(DEFAULT_FALLBACK_LANE_TTL_SECS),
            fallback_tier: QualityTier::default(),
            cuisine_mode: CuisineMode::default(),
            fallback_seed: None,
        }
    }
}

/// A filtered, ranked result set as stored in the cache or the fallback lane.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    /// Accepted restaurants, best match first, not yet truncated to `maxResults`.
    pub restaurants: Vec<Restaurant>,
    pub confidence: f64,
    pub quality_stats: ParseStats,
    pub validation_stats: ValidationStats,
    pub fallback_strategy: Option<FallbackStrategy>,
    pub message: String,
}

impl ResultSet {
    pub fn used_fallback(&self) -> bool {
        self.fallback_strategy.is_some()
    }
}

/// `searchMetadata` of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    pub request_id: String,
    pub query: String,
    pub location: String,
    /// Restaurants that passed validation, before truncation.
    pub total_found: usize,
    pub search_timestamp: DateTime<Utc>,
    pub confidence: f64,
    pub used_fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_strategy: Option<FallbackStrategy>,
    pub message: String,
    pub quality_stats: ParseStats,
    pub validation_stats: ValidationStats,
}

/// Successful pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub restaurants: Vec<Restaurant>,
    pub total_results: usize,
    pub search_metadata: SearchMetadata,
    pub search_params: SearchRequest,
    pub cached: bool,
    /// How the response was produced; surfaced as a header rather than in the body.
    #[serde(skip, default = "default_status")]
    pub status: SearchStatus,
}

fn default_status() -> SearchStatus {
    SearchStatus::Miss
}

/// Client-facing body of a terminal failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureBody {
    pub error: String,
    pub suggestions: Vec<String>,
    pub can_retry: bool,
}
