use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::geo::Coordinates;

pub const DINESCOUT_STATUS_HEADER: &str = "X-Dinescout-Status";
pub const DINESCOUT_STATUS_HEALTHY: &str = "healthy";
pub const DINESCOUT_STATUS_READY: &str = "ready";
pub const DINESCOUT_STATUS_NOT_READY: &str = "not_ready";

/// How a search response was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    Hit,
    Miss,
    Fallback,
    Error,
}

impl SearchStatus {
    #[inline]
    pub fn as_header_value(&self) -> &'static str {
        match self {
            SearchStatus::Hit => "HIT",
            SearchStatus::Miss => "MISS",
            SearchStatus::Fallback => "FALLBACK",
            SearchStatus::Error => "ERROR",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, SearchStatus::Hit)
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header_value())
    }
}

/// What a cached result set was searched for; used for stale-entry matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheMetadata {
    pub query: String,
    pub city: Option<String>,
    pub origin: Option<Coordinates>,
    pub radius_miles: f64,
}

impl CacheMetadata {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// One stored result set.
#[derive(Debug, Clone)]
pub struct CacheEntry<P> {
    pub key: String,
    pub payload: Arc<P>,
    pub metadata: CacheMetadata,
    pub created_at: Instant,
    pub expires_at: Instant,
    pub access_count: u64,
    pub last_access: Instant,
    pub schema_version: u32,
    pub(crate) tick: u64,
}

impl<P> CacheEntry<P> {
    /// Expired strictly after `expires_at`.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// A cached entry whose query resembles the one asked about.
#[derive(Debug, Clone)]
pub struct SimilarEntry<P> {
    pub key: String,
    pub similarity: f64,
    pub metadata: CacheMetadata,
    pub payload: Arc<P>,
    /// The entry's TTL has passed (it is still present because nothing swept it yet).
    pub stale: bool,
}

/// Counters since construction plus current occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub inserts: u64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hits over lookups, 0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
