//! Time abstraction for fix timestamps and data staleness checks.
//!
//! The navigation core never reads a clock itself. Hosts stamp fixes and age
//! declination data through a `TimeSource`, so the same code runs against the
//! system clock in production and a controllable clock in tests.

use core::sync::atomic::{AtomicU64, Ordering};

/// Monotonic clock read by the pilot session.
///
/// The host supplies `SystemClock` and `SharedClock`; tests use `MockTime`.
///
/// # Example
///
/// ```
/// use route_pilot_core::traits::{MockTime, TimeSource};
///
/// fn is_stale<T: TimeSource>(time: &T, stamped_us: u64, max_age_us: u64) -> bool {
///     time.elapsed_since(stamped_us) > max_age_us
/// }
///
/// let time = MockTime::new();
/// assert!(!is_stale(&time, 0, 1_000));
/// time.advance(2_000);
/// assert!(is_stale(&time, 0, 1_000));
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Milliseconds since the clock's epoch, used for fix timestamps
    fn now_ms(&self) -> u64;

    /// Microseconds since the clock's epoch
    fn now_us(&self) -> u64;

    /// Age of a timestamp in microseconds; zero for timestamps ahead of now
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Hand-advanced clock for tests.
///
/// Cloning takes a snapshot: the clone starts at the same time and then
/// advances independently.
///
/// # Example
///
/// ```
/// use route_pilot_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance(1_500_000);
/// assert_eq!(time.now_ms(), 1_500);
/// ```
#[derive(Default)]
pub struct MockTime {
    current_us: AtomicU64,
}

impl MockTime {
    pub const fn new() -> Self {
        Self::with_initial(0)
    }

    /// Clock starting at `us`
    pub const fn with_initial(us: u64) -> Self {
        Self {
            current_us: AtomicU64::new(us),
        }
    }

    /// Jump to `us`
    pub fn set(&self, us: u64) {
        self.current_us.store(us, Ordering::Relaxed);
    }

    pub fn advance(&self, us: u64) {
        self.current_us.fetch_add(us, Ordering::Relaxed);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(secs.saturating_mul(1_000_000));
    }
}

impl Clone for MockTime {
    fn clone(&self) -> Self {
        Self::with_initial(self.now_us())
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    fn now_us(&self) -> u64 {
        self.current_us.load(Ordering::Relaxed)
    }
}
