//! Time source
//!
//! Business code never reads the wall clock directly: timestamps, cache ages
//! and the dashboard's "today" all come from a [`Clock`] held in the server
//! state, so tests can drive time with [`ManualClock`].

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// Millisecond time source
pub trait Clock: Send + Sync + Debug {
    /// Current Unix time in milliseconds
    fn now_millis(&self) -> i64;

    /// Current UTC calendar date as `YYYY-MM-DD`
    fn today(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.now_millis())
            .unwrap_or_default()
            .format("%Y-%m-%d")
            .to_string()
    }
}

pub type SharedClock = Arc<dyn Clock>;

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
