//! Rate-limited divergence reporting

use std::time::Duration;

use motus_core::MotionTime;
use motus_visual::AngleDiff;

use crate::REPORT_INTERVAL;

/// One emitted divergence report
#[derive(Clone, Debug, PartialEq)]
pub struct DiffReport {
    /// 1-based reference frame number
    pub frame: usize,
    /// Reference frame count
    pub frames: usize,
    /// Mean absolute joint difference, degrees
    pub avg_diff_deg: f32,
}

impl std::fmt::Display for DiffReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Avg diff (frame {}/{}): {:.1} deg",
            self.frame, self.frames, self.avg_diff_deg
        )
    }
}

/// Emits at most one report per interval
#[derive(Debug)]
pub struct DiffReporter {
    interval: Duration,
    last_report: Option<MotionTime>,
}

impl DiffReporter {
    pub fn new(interval: Duration) -> Self {
        DiffReporter {
            interval,
            last_report: None,
        }
    }

    /// Offer a difference; returns the report if one is due
    pub fn observe(
        &mut self,
        now: MotionTime,
        diff: &AngleDiff,
        index: usize,
        frames: usize,
    ) -> Option<DiffReport> {
        if let Some(last) = self.last_report {
            if now - last < self.interval {
                return None;
            }
        }

        let avg_diff_deg = diff.mean_abs();
        if !avg_diff_deg.is_finite() {
            return None;
        }

        self.last_report = Some(now);
        let report = DiffReport {
            frame: index + 1,
            frames,
            avg_diff_deg,
        };
        tracing::info!(
            frame = report.frame,
            frames = report.frames,
            avg_diff_deg = report.avg_diff_deg,
            "{}",
            report
        );
        Some(report)
    }

    /// Forget the last report so the next observation is emitted
    pub fn reset(&mut self) {
        self.last_report = None;
    }
}

impl Default for DiffReporter {
    fn default() -> Self {
        Self::new(REPORT_INTERVAL)
    }
}
