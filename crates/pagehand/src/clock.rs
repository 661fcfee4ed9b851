//! Clocks for polling and retry delays.
//!
//! Every wait and retry loop reads time and sleeps through a [`Clock`], so
//! tests can swap the wall clock for a [`FakeClock`] whose `sleep` advances
//! virtual time instantly.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source with a blocking sleep
pub trait Clock: Send + Sync + Debug {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Shared handle to a new system clock
    #[must_use]
    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Fake clock for deterministic testing
///
/// Time only moves when [`Clock::sleep`] or [`FakeClock::advance`] is called.
#[derive(Debug, Default)]
pub struct FakeClock {
    /// Current virtual time in microseconds
    current_us: AtomicU64,
    /// Number of sleeps requested
    sleeps: AtomicU64,
    /// Total virtual time slept in microseconds
    slept_us: AtomicU64,
}

impl FakeClock {
    /// Create a fake clock at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to a new fake clock
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Move virtual time forward without counting a sleep
    pub fn advance(&self, duration: Duration) {
        self.current_us
            .fetch_add(duration.as_micros() as u64, Ordering::SeqCst);
    }

    /// Number of times `sleep` was called
    #[must_use]
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.load(Ordering::SeqCst)
    }

    /// Total virtual time spent in `sleep`
    #[must_use]
    pub fn total_slept(&self) -> Duration {
        Duration::from_micros(self.slept_us.load(Ordering::SeqCst))
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.current_us.load(Ordering::SeqCst))
    }

    fn sleep(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.slept_us.fetch_add(us, Ordering::SeqCst);
        self.current_us.fetch_add(us, Ordering::SeqCst);
    }
}
