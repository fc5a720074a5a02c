use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use super::types::SweepReport;
use crate::cache::SearchCache;

/// Shortest accepted sweep period.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(10);

/// Periodically drops expired and over-age entries from a [`SearchCache`].
///
/// Sweeps take the same lock as foreground lookups; expiry stays lazy on access, so the
/// sweeper only bounds memory held by cold entries.
pub struct CacheSweeper<P: Send + Sync + 'static> {
    cache: Arc<SearchCache<P>>,
    interval: Duration,
    max_age: Duration,
    shutdown_initiated: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
    sweeps: Arc<AtomicU64>,
}

impl<P: Send + Sync + 'static> CacheSweeper<P> {
    pub fn new(cache: Arc<SearchCache<P>>, interval: Duration, max_age: Duration) -> Self {
        Self {
            cache,
            interval: interval.max(MIN_SWEEP_INTERVAL),
            max_age,
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(false)),
            wake: Arc::new(Notify::new()),
            sweeps: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn is_shutdown_initiated(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Acquire)
    }

    /// Sweeps completed by the background task.
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    /// Runs one sweep now.
    pub fn sweep_once(&self) -> SweepReport {
        sweep(&self.cache, self.max_age)
    }

    /// Starts the background sweep task (no-op if already running or shut down).
    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        if self.is_shutdown_initiated() || self.running.swap(true, Ordering::AcqRel) {
            return tokio::spawn(async {});
        }

        let cache = Arc::clone(&self.cache);
        let period = self.interval;
        let max_age = self.max_age;
        let shutdown_initiated = Arc::clone(&self.shutdown_initiated);
        let running = Arc::clone(&self.running);
        let wake = Arc::clone(&self.wake);
        let sweeps = Arc::clone(&self.sweeps);

        info!(interval_secs = period.as_secs_f64(), "Cache sweeper started");

        tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = wake.notified() => {}
                }
                if shutdown_initiated.load(Ordering::Acquire) {
                    break;
                }

                let report = sweep(&cache, max_age);
                sweeps.fetch_add(1, Ordering::Relaxed);
                if report.removed() > 0 {
                    debug!(
                        purged = report.purged,
                        aged_out = report.aged_out,
                        remaining = report.remaining,
                        "Cache sweep removed entries"
                    );
                }
            }

            running.store(false, Ordering::Release);
            info!("Cache sweeper stopped");
        })
    }

    /// Stops the background task at its next wake-up (idempotent).
    pub fn shutdown(&self) {
        if self.shutdown_initiated.swap(true, Ordering::AcqRel) {
            return;
        }
        self.wake.notify_one();
    }
}

fn sweep<P>(cache: &SearchCache<P>, max_age: Duration) -> SweepReport {
    let purged = cache.purge_expired();
    let aged_out = cache.expire_older_than(max_age);
    SweepReport {
        purged,
        aged_out,
        remaining: cache.len(),
    }
}

impl<P: Send + Sync + 'static> std::fmt::Debug for CacheSweeper<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheSweeper")
            .field("interval", &self.interval)
            .field("max_age", &self.max_age)
            .field("running", &self.is_running())
            .field("sweeps", &self.sweeps())
            .finish()
    }
}
