//! Clock implementations for MOTUS

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use motus_core::MotionTime;

/// Source of monotonic motion time
///
/// INVARIANT: successive calls to `now` never go backwards
pub trait Clock {
    fn now(&self) -> MotionTime;
}

/// Monotonic clock backed by the OS
pub struct MonotonicClock {
    /// Reference instant (τm = 0)
    reference: Instant,
}

impl MonotonicClock {
    /// Create a new clock starting at zero
    pub fn new() -> Self {
        MonotonicClock {
            reference: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> MotionTime {
        let elapsed = self.reference.elapsed();
        MotionTime::from_micros(elapsed.as_micros() as u64)
    }
}

/// Manually driven clock for simulation and tests
///
/// Clones share the same timeline, so a harness can keep a handle while
/// the engine owns another.
#[derive(Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a given time
    pub fn starting_at(t: MotionTime) -> Self {
        ManualClock {
            micros: Arc::new(AtomicU64::new(t.as_micros())),
        }
    }

    /// Advance the clock; returns the new time
    pub fn advance(&self, dt: Duration) -> MotionTime {
        let dt = dt.as_micros() as u64;
        let prev = self.micros.fetch_add(dt, Ordering::SeqCst);
        MotionTime::from_micros(prev + dt)
    }

    /// Move forward to `t`; earlier targets are ignored
    pub fn set(&self, t: MotionTime) {
        self.micros.fetch_max(t.as_micros(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> MotionTime {
        MotionTime::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> MotionTime {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> MotionTime {
        (**self).now()
    }
}
