//! Host time sources

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use route_pilot_core::traits::TimeSource;

/// Monotonic clock measured from its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

/// Manually advanced clock whose clones share one time
///
/// Used to drive a session from a simulator or a test, where the owner of
/// the clock and the session must observe the same time.
#[derive(Debug, Clone, Default)]
pub struct SharedClock {
    now_us: Arc<AtomicU64>,
}

impl SharedClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_us(&self, us: u64) {
        self.now_us.store(us, Ordering::Relaxed);
    }

    pub fn advance(&self, by: Duration) {
        self.now_us
            .fetch_add(by.as_micros() as u64, Ordering::Relaxed);
    }
}

impl TimeSource for SharedClock {
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    fn now_us(&self) -> u64 {
        self.now_us.load(Ordering::Relaxed)
    }
}
