//! Short-TTL lane for synthesized fallback responses.
//!
//! Kept apart from [`super::SearchCache`] so synthetic data never answers a healthy
//! request. Repeated failures for the same key return the same fallback set until the
//! lane entry expires.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

/// Time-bounded fallback store keyed by search cache key.
pub struct FallbackLane<P: Send + Sync + 'static> {
    entries: Cache<String, Arc<P>>,
    ttl: Duration,
}

impl<P: Send + Sync + 'static> FallbackLane<P> {
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            ttl,
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<Arc<P>> {
        self.entries.get(key)
    }

    #[inline]
    pub fn insert(&self, key: impl Into<String>, payload: P) -> Arc<P> {
        let payload = Arc::new(payload);
        self.entries.insert(key.into(), Arc::clone(&payload));
        payload
    }

    #[inline]
    pub fn invalidate(&self, key: &str) {
        self.entries.invalidate(key);
    }

    /// Approximate entry count (moka applies writes lazily).
    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<P: Send + Sync + 'static> std::fmt::Debug for FallbackLane<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackLane")
            .field("entries", &self.entries.entry_count())
            .field("ttl", &self.ttl)
            .finish()
    }
}
