//! Sliding-window error counter keyed by a coarse origin bucket.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Counts provider errors per bucket over a sliding window.
///
/// Once a bucket has `limit` errors inside the window it is tripped and retries for that
/// bucket are suppressed until old errors age out.
#[derive(Debug)]
pub struct ErrorRateLimiter {
    limit: usize,
    window: Duration,
    buckets: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl ErrorRateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records an error now and returns the bucket's count inside the window.
    pub fn record(&self, bucket: &str) -> usize {
        self.record_at(bucket, Instant::now())
    }

    /// Also drops every other bucket whose errors have all aged out.
    pub fn record_at(&self, bucket: &str, now: Instant) -> usize {
        let mut buckets = self.buckets.lock();
        buckets.retain(|_, events| {
            Self::prune(events, now, self.window);
            !events.is_empty()
        });
        let events = buckets.entry(bucket.to_string()).or_default();
        events.push_back(now);
        events.len()
    }

    /// Errors recorded for `bucket` inside the window.
    pub fn count(&self, bucket: &str) -> usize {
        self.count_at(bucket, Instant::now())
    }

    pub fn count_at(&self, bucket: &str, now: Instant) -> usize {
        let mut buckets = self.buckets.lock();
        match buckets.get_mut(bucket) {
            Some(events) => {
                Self::prune(events, now, self.window);
                let len = events.len();
                if len == 0 {
                    buckets.remove(bucket);
                }
                len
            }
            None => 0,
        }
    }

    /// `true` once the bucket has reached the limit inside the window.
    pub fn is_tripped(&self, bucket: &str) -> bool {
        self.count(bucket) >= self.limit
    }

    pub fn is_tripped_at(&self, bucket: &str, now: Instant) -> bool {
        self.count_at(bucket, now) >= self.limit
    }

    /// Number of buckets currently tracked.
    pub fn tracked_buckets(&self) -> usize {
        self.buckets.lock().len()
    }

    pub fn reset(&self) {
        self.buckets.lock().clear();
    }

    fn prune(events: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(oldest) = events.front() {
            if now.saturating_duration_since(*oldest) >= window {
                events.pop_front();
            } else {
                break;
            }
        }
    }
}
