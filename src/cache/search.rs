//! Bounded LRU + TTL store of validated result sets.
//!
//! One mutex guards the entry map and the recency index. Recency is a monotonically
//! increasing tick per access; the `BTreeMap<tick, key>` yields the least recently used
//! key in O(log n). Expiry is lazy: `get`/`has` drop expired entries they touch, and
//! [`SearchCache::purge_expired`] is available for periodic sweeps.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use super::types::{CacheEntry, CacheMetadata, CacheStats, SimilarEntry};
use crate::constants::CACHE_SCHEMA_VERSION;
use crate::text;

const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

struct CacheState<P> {
    entries: HashMap<String, CacheEntry<P>>,
    recency: BTreeMap<u64, String>,
    next_tick: u64,
    hits: u64,
    misses: u64,
    expirations: u64,
    evictions: u64,
    inserts: u64,
}

impl<P> CacheState<P> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            next_tick: 0,
            hits: 0,
            misses: 0,
            expirations: 0,
            evictions: 0,
            inserts: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.next_tick += 1;
        self.next_tick
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry<P>> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(&entry.tick);
        Some(entry)
    }

    fn evict_lru(&mut self) -> Option<String> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }

    fn remove_where(&mut self, pred: impl Fn(&CacheEntry<P>) -> bool) -> usize {
        let doomed: Vec<String> = self
            .entries
            .values()
            .filter(|e| pred(e))
            .map(|e| e.key.clone())
            .collect();
        for key in &doomed {
            self.remove(key);
        }
        doomed.len()
    }
}

/// In-memory search cache shared across requests.
pub struct SearchCache<P> {
    state: Mutex<CacheState<P>>,
    capacity: usize,
    ttl: Duration,
}

impl<P> SearchCache<P> {
    /// A cache holding at most `capacity` entries (minimum 1) for `ttl` each.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload if present and unexpired, marking it most recently used.
    pub fn get(&self, key: &str) -> Option<Arc<P>> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &str, now: Instant) -> Option<Arc<P>> {
        let mut state = self.state.lock();

        let Some(expired) = state.entries.get(key).map(|e| e.is_expired_at(now)) else {
            state.misses += 1;
            return None;
        };

        if expired {
            state.remove(key);
            state.expirations += 1;
            state.misses += 1;
            return None;
        }

        let tick = state.tick();
        let (old_tick, payload) = match state.entries.get_mut(key) {
            Some(entry) => {
                let old = entry.tick;
                entry.tick = tick;
                entry.access_count += 1;
                entry.last_access = now;
                (old, Arc::clone(&entry.payload))
            }
            None => return None,
        };
        state.recency.remove(&old_tick);
        state.recency.insert(tick, key.to_string());
        state.hits += 1;
        Some(payload)
    }

    /// Inserts or overwrites with the default TTL.
    pub fn set(&self, key: impl Into<String>, payload: P, metadata: CacheMetadata) {
        self.set_with_ttl_at(key, payload, metadata, self.ttl, Instant::now());
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, payload: P, metadata: CacheMetadata, ttl: Duration) {
        self.set_with_ttl_at(key, payload, metadata, ttl, Instant::now());
    }

    /// Inserts or overwrites. A new key at capacity first evicts the least recently used entry.
    pub fn set_with_ttl_at(
        &self,
        key: impl Into<String>,
        payload: P,
        metadata: CacheMetadata,
        ttl: Duration,
        now: Instant,
    ) {
        let key = key.into();
        let mut state = self.state.lock();

        if state.remove(&key).is_none() && state.entries.len() >= self.capacity {
            if let Some(evicted) = state.evict_lru() {
                state.evictions += 1;
                debug!(evicted = %evicted, "Evicted least recently used cache entry");
            }
        }

        let tick = state.tick();
        state.recency.insert(tick, key.clone());
        state.entries.insert(
            key.clone(),
            CacheEntry {
                key,
                payload: Arc::new(payload),
                metadata,
                created_at: now,
                expires_at: now.checked_add(ttl).unwrap_or(now + MAX_TTL),
                access_count: 0,
                last_access: now,
                schema_version: CACHE_SCHEMA_VERSION,
                tick,
            },
        );
        state.inserts += 1;
    }

    /// Presence check with `get`'s expiry semantics. Does not change recency.
    pub fn has(&self, key: &str) -> bool {
        self.has_at(key, Instant::now())
    }

    pub fn has_at(&self, key: &str, now: Instant) -> bool {
        let mut state = self.state.lock();
        match state.entries.get(key).map(|e| e.is_expired_at(now)) {
            Some(false) => true,
            Some(true) => {
                state.remove(key);
                state.expirations += 1;
                false
            }
            None => false,
        }
    }

    /// Removes entries created more than `max_age` ago. Returns how many were removed.
    pub fn expire_older_than(&self, max_age: Duration) -> usize {
        self.expire_older_than_at(max_age, Instant::now())
    }

    pub fn expire_older_than_at(&self, max_age: Duration, now: Instant) -> usize {
        let mut state = self.state.lock();
        let removed = match now.checked_sub(max_age) {
            Some(cutoff) => state.remove_where(|e| e.created_at < cutoff),
            None => 0,
        };
        state.expirations += removed as u64;
        removed
    }

    /// Removes entries whose TTL has passed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut state = self.state.lock();
        let removed = state.remove_where(|e| e.is_expired_at(now));
        state.expirations += removed as u64;
        removed
    }

    /// Entries whose original query has token-set similarity >= `min_similarity` with
    /// `query`, best first. Expired entries that have not been swept are included and
    /// flagged `stale`. Lookup statistics and recency are left untouched.
    pub fn find_similar(&self, query: &str, min_similarity: f64) -> Vec<SimilarEntry<P>> {
        self.find_similar_at(query, min_similarity, Instant::now())
    }

    pub fn find_similar_at(&self, query: &str, min_similarity: f64, now: Instant) -> Vec<SimilarEntry<P>> {
        let state = self.state.lock();
        let mut found: Vec<SimilarEntry<P>> = state
            .entries
            .values()
            .filter_map(|entry| {
                let similarity = text::jaccard(query, &entry.metadata.query);
                (similarity >= min_similarity).then(|| SimilarEntry {
                    key: entry.key.clone(),
                    similarity,
                    metadata: entry.metadata.clone(),
                    payload: Arc::clone(&entry.payload),
                    stale: entry.is_expired_at(now),
                })
            })
            .collect();
        found.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.key.cmp(&b.key))
        });
        found
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.state.lock().recency.values().cloned().collect()
    }

    /// Access count of a present entry (expired or not).
    pub fn access_count(&self, key: &str) -> Option<u64> {
        self.state.lock().entries.get(key).map(|e| e.access_count)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.state.lock().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.recency.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            expirations: state.expirations,
            evictions: state.evictions,
            inserts: state.inserts,
            size: state.entries.len(),
            capacity: self.capacity,
        }
    }
}

impl<P> std::fmt::Debug for SearchCache<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCache")
            .field("entries", &self.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}
