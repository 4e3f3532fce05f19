//! Engine configuration

use std::path::Path;
use std::time::Duration;

use motus_core::{MotusError, MotusResult, LANDMARK_COUNT};
use motus_time::{SyncConfig, COMPARE_FPS};
use motus_visual::{StabilizerConfig, DEFAULT_WINDOW_SIZE, JITTER_RADIUS, MIN_BLEND};
use serde::{Deserialize, Serialize};

use crate::{RecordingConfig, MAX_RECORD_DURATION};

/// Default interval between divergence reports
pub const REPORT_INTERVAL: Duration = Duration::from_millis(750);

/// MOTUS engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stabilizer sliding window size
    pub window_size: usize,
    /// Stabilizer noise threshold, normalized frame units
    pub jitter_radius: f32,
    /// Stabilizer minimum blend toward the window mean
    pub min_blend: f32,
    /// Recording auto-stop, milliseconds
    pub max_record_ms: u64,
    /// Comparison playback rate
    pub compare_fps: u32,
    /// Rate written into exported recordings
    pub export_fps: u32,
    /// Minimum interval between divergence reports, milliseconds
    pub report_interval_ms: u64,
    /// Expected detector landmark count
    pub landmark_count: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            jitter_radius: JITTER_RADIUS,
            min_blend: MIN_BLEND,
            max_record_ms: MAX_RECORD_DURATION.as_millis() as u64,
            compare_fps: COMPARE_FPS,
            export_fps: COMPARE_FPS,
            report_interval_ms: REPORT_INTERVAL.as_millis() as u64,
            landmark_count: LANDMARK_COUNT,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> MotusResult<Self> {
        serde_json::from_str::<EngineConfig>(json)
            .map(EngineConfig::sanitized)
            .map_err(|e| MotusError::Config(e.to_string()))
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> MotusResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Apply `MOTUS_*` environment overrides
    ///
    /// - `MOTUS_WINDOW_SIZE`: integer
    /// - `MOTUS_COMPARE_FPS`: integer
    /// - `MOTUS_RECORD_DURATION`: duration, e.g. `4s`
    /// - `MOTUS_REPORT_INTERVAL`: duration, e.g. `750ms`
    pub fn with_env_overrides(self) -> MotusResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> MotusResult<Self> {
        if let Some(v) = lookup("MOTUS_WINDOW_SIZE") {
            self.window_size = parse_number("MOTUS_WINDOW_SIZE", &v)?;
        }
        if let Some(v) = lookup("MOTUS_COMPARE_FPS") {
            self.compare_fps = parse_number("MOTUS_COMPARE_FPS", &v)?;
        }
        if let Some(v) = lookup("MOTUS_RECORD_DURATION") {
            self.max_record_ms = parse_duration("MOTUS_RECORD_DURATION", &v)?.as_millis() as u64;
        }
        if let Some(v) = lookup("MOTUS_REPORT_INTERVAL") {
            self.report_interval_ms = parse_duration("MOTUS_REPORT_INTERVAL", &v)?.as_millis() as u64;
        }
        Ok(self.sanitized())
    }

    /// Coerce invalid values instead of failing
    pub fn sanitized(mut self) -> Self {
        let defaults = EngineConfig::default();
        if self.window_size == 0 {
            tracing::warn!("window_size 0 coerced to 1");
            self.window_size = 1;
        }
        if self.compare_fps == 0 {
            tracing::warn!(default = defaults.compare_fps, "compare_fps 0 replaced by default");
            self.compare_fps = defaults.compare_fps;
        }
        if self.export_fps == 0 {
            self.export_fps = defaults.export_fps;
        }
        if !self.jitter_radius.is_finite() || self.jitter_radius <= 0.0 {
            tracing::warn!(value = self.jitter_radius, "invalid jitter_radius replaced by default");
            self.jitter_radius = defaults.jitter_radius;
        }
        self.min_blend = if self.min_blend.is_finite() {
            self.min_blend.clamp(0.0, 1.0)
        } else {
            defaults.min_blend
        };
        self
    }

    pub fn stabilizer(&self) -> StabilizerConfig {
        StabilizerConfig {
            window_size: self.window_size,
            jitter_radius: self.jitter_radius,
            min_blend: self.min_blend,
        }
    }

    pub fn sync(&self) -> SyncConfig {
        SyncConfig::with_fps(self.compare_fps)
    }

    pub fn recording(&self) -> RecordingConfig {
        RecordingConfig {
            max_duration: Duration::from_millis(self.max_record_ms),
            fps: self.export_fps,
        }
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> MotusResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| MotusError::Config(format!("{}={:?}: {}", key, value, e)))
}

fn parse_duration(key: &str, value: &str) -> MotusResult<Duration> {
    humantime::parse_duration(value.trim())
        .map_err(|e| MotusError::Config(format!("{}={:?}: {}", key, value, e)))
}
