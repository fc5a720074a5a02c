//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift
//! (e.g. the fallback threshold sits a fixed distance below the acceptance threshold).

use std::time::Duration;

/// Default cache time-to-live, in minutes.
pub const DEFAULT_CACHE_TTL_MINUTES: u64 = 30;
/// Default maximum number of cache entries.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;
/// Schema tag stamped on every cache entry. Bump when [`crate::parser::Restaurant`] changes shape.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Default number of restaurants returned per search.
pub const DEFAULT_MAX_RESULTS: usize = 8;
/// Hard ceiling on a request's `maxResults`.
pub const MAX_RESULTS_CEILING: usize = 20;
/// Default search radius, in miles.
pub const DEFAULT_RADIUS_MILES: f64 = 10.0;

/// Default provider call budget.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 30_000;
/// Default provider attempts per request (first try included).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default fixed delay between provider attempts.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1_000;

/// Default validator acceptance threshold applied by the pipeline.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: u8 = 60;
/// Default (lowered) acceptance threshold for fallback result sets.
pub const DEFAULT_FALLBACK_THRESHOLD: u8 = DEFAULT_ACCEPTANCE_THRESHOLD - 20;

/// Errors per window (per origin) before retries are suppressed.
pub const DEFAULT_ERROR_RATE_LIMIT: usize = 10;
/// Sliding window of the error-rate limiter.
pub const DEFAULT_ERROR_RATE_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Default interval of the background cache sweep.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5 * 60;
/// Default TTL of the last-resort fallback lane.
pub const DEFAULT_FALLBACK_LANE_TTL_SECS: u64 = 5 * 60;
/// Capacity of the last-resort fallback lane.
pub const FALLBACK_LANE_CAPACITY: u64 = 256;

/// Decimal places kept when rounding coordinates for cache keys (~111 m).
pub const COORDINATE_KEY_PRECISION: usize = 3;
/// Delimiter between cache-key components.
pub const CACHE_KEY_DELIMITER: char = '|';

/// Records with coordinates farther than this from the search origin are rejected by the parser.
pub const MAX_PLAUSIBLE_DISTANCE_MILES: f64 = 50.0;
/// Records farther than this from the search origin draw a validator warning.
pub const DISTANCE_WARNING_MILES: f64 = 25.0;

/// Sentinel used when a distance cannot be computed.
pub const UNKNOWN_DISTANCE: &str = "Unknown";

/// Confidence reported for synthesized fallback result sets.
pub const FALLBACK_CONFIDENCE: f64 = 0.6;
/// Confidence reported for stale cache entries served during an outage.
pub const STALE_CACHE_CONFIDENCE: f64 = 0.75;
/// Confidence reported for results obtained with a simplified query.
pub const SIMPLIFIED_QUERY_CONFIDENCE: f64 = 0.8;
/// Upper bound on confidence for live provider results.
pub const MAX_LIVE_CONFIDENCE: f64 = 0.95;

/// Minimum Jaccard similarity for a cached query to count as "nearby".
pub const STALE_MATCH_MIN_SIMILARITY: f64 = 0.5;
