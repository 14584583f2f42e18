use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Time source for the tracker. `now_millis` must be monotonic within one
/// process; only differences between readings are meaningful. `wall_time`
/// is used for run identifiers, never for duration arithmetic.
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> u64;
    fn wall_time(&self) -> DateTime<Utc>;
}

/// Production clock: monotonic millis since construction, wall time from
/// the system. Built on `tokio::time::Instant` so paused-time tests see a
/// consistent view.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: tokio::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn wall_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-cranked clock for tests. Clones share the same underlying counter,
/// so a test body can advance time under a tracker it no longer owns.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, milliseconds: u64) {
        self.millis.fetch_add(milliseconds, Ordering::SeqCst);
    }

    pub fn set(&self, milliseconds: u64) {
        self.millis.store(milliseconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }

    fn wall_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_millis() as i64).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
