//! Time primitives for MOTUS
//!
//! All engine timing runs on a single monotonic timeline (τm), represented as
//! microseconds since the clock was created. Wall-clock time only appears in
//! exported recordings.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Motion time (τm) - monotonic, local-driven
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MotionTime(pub u64);

impl MotionTime {
    pub const ZERO: MotionTime = MotionTime(0);

    #[inline]
    pub fn from_micros(micros: u64) -> Self {
        MotionTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: u64) -> Self {
        MotionTime(millis * 1000)
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        MotionTime(self.0.saturating_add(micros))
    }

    /// Time elapsed since an earlier instant (zero if `earlier` is later)
    #[inline]
    pub fn since(self, earlier: MotionTime) -> Duration {
        self - earlier
    }
}

impl Add<Duration> for MotionTime {
    type Output = MotionTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<MotionTime> for MotionTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: MotionTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for MotionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "τm({:.3}ms)", self.0 as f64 / 1000.0)
    }
}
