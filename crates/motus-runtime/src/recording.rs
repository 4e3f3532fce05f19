//! Recording Buffer - captured instructor motion
//!
//! A recording is an ordered list of stabilized landmark sets with the joint
//! angles measured on each. It is append-only while recording and read-only
//! afterwards, until the next recording or an import replaces it.
//!
//! INVARIANT: `frames.len() == angles.len()` whenever a recording leaves the
//! buffer (on stop and on import).

use std::time::{Duration, SystemTime};

use motus_core::{AngleMapping, LandmarkSet, MotionTime, MotusError, MotusResult};
use motus_time::COMPARE_FPS;
use motus_visual::compute_angles;
use serde::{Deserialize, Serialize};

/// Recordings stop on their own after this long
pub const MAX_RECORD_DURATION: Duration = Duration::from_millis(4000);

/// Recording configuration
#[derive(Clone, Debug)]
pub struct RecordingConfig {
    /// Auto-stop duration
    pub max_duration: Duration,
    /// Rate stamped on new recordings
    pub fps: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        RecordingConfig {
            max_duration: MAX_RECORD_DURATION,
            fps: COMPARE_FPS,
        }
    }
}

/// Why a recording ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Stopped by the user
    Manual,
    /// Reached the maximum duration
    Completed,
    /// The live stream went away
    CameraStopped,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StopReason::Manual => "stopped manually",
            StopReason::Completed => "completed automatically",
            StopReason::CameraStopped => "stopped with camera",
        })
    }
}

/// Exported/imported form of a recording
///
/// Every field is optional on the way in so that validation can report
/// exactly what is missing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingPayload {
    #[serde(default)]
    pub frames: Option<Vec<LandmarkSet>>,
    #[serde(default)]
    pub angles: Option<Vec<Option<AngleMapping>>>,
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A captured motion sequence
#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    frames: Vec<LandmarkSet>,
    angles: Vec<Option<AngleMapping>>,
    fps: u32,
    created_at: SystemTime,
}

impl Recording {
    /// Empty recording stamped now
    pub fn new(fps: u32) -> Self {
        Recording {
            frames: Vec::new(),
            angles: Vec::new(),
            fps,
            created_at: SystemTime::now(),
        }
    }

    /// Build from frames alone, deriving every angle mapping
    pub fn from_frames(frames: Vec<LandmarkSet>, fps: u32) -> Self {
        let mut recording = Recording {
            frames,
            angles: Vec::new(),
            fps,
            created_at: SystemTime::now(),
        };
        recording.reconcile_angles();
        recording
    }

    /// Restore the frames/angles invariant
    ///
    /// A length mismatch re-derives the whole angle array from the frames;
    /// otherwise only missing entries are derived. Returns true when anything
    /// was recomputed.
    pub fn reconcile_angles(&mut self) -> bool {
        if self.angles.len() != self.frames.len() {
            self.angles = self
                .frames
                .iter()
                .map(|frame| compute_angles(Some(frame)))
                .collect();
            return true;
        }

        let mut changed = false;
        for (frame, angles) in self.frames.iter().zip(self.angles.iter_mut()) {
            if angles.is_none() {
                *angles = compute_angles(Some(frame));
                changed |= angles.is_some();
            }
        }
        changed
    }

    fn push(&mut self, frame: LandmarkSet, angles: Option<AngleMapping>) {
        self.frames.push(frame);
        self.angles.push(angles);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&LandmarkSet> {
        self.frames.get(index)
    }

    pub fn angles_at(&self, index: usize) -> Option<&AngleMapping> {
        self.angles.get(index).and_then(Option::as_ref)
    }

    pub fn frames(&self) -> &[LandmarkSet] {
        &self.frames
    }

    pub fn angles(&self) -> &[Option<AngleMapping>] {
        &self.angles
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn to_payload(&self) -> RecordingPayload {
        RecordingPayload {
            frames: Some(self.frames.clone()),
            angles: Some(self.angles.clone()),
            fps: Some(self.fps),
            created_at: Some(humantime::format_rfc3339_millis(self.created_at).to_string()),
        }
    }

    /// Validate a payload and build a recording from it
    pub fn from_payload(payload: RecordingPayload) -> MotusResult<Self> {
        let frames = payload.frames.ok_or(MotusError::MissingFrames)?;

        let created_at = match payload.created_at.as_deref() {
            Some(ts) => humantime::parse_rfc3339_weak(ts).unwrap_or_else(|e| {
                tracing::warn!(created_at = ts, error = %e, "unreadable createdAt, using now");
                SystemTime::now()
            }),
            None => SystemTime::now(),
        };

        let mut recording = Recording {
            frames,
            angles: payload.angles.unwrap_or_default(),
            fps: payload.fps.filter(|&fps| fps > 0).unwrap_or(COMPARE_FPS),
            created_at,
        };
        if recording.reconcile_angles() {
            tracing::debug!(frames = recording.len(), "derived angles for imported recording");
        }
        Ok(recording)
    }

    /// Serialize to pretty JSON
    pub fn export_json(&self) -> MotusResult<String> {
        serde_json::to_string_pretty(&self.to_payload())
            .map_err(|e| MotusError::InvalidPayload(e.to_string()))
    }

    /// Parse and validate JSON
    pub fn import_json(json: &str) -> MotusResult<Self> {
        let payload: RecordingPayload =
            serde_json::from_str(json).map_err(|e| MotusError::InvalidPayload(e.to_string()))?;
        Self::from_payload(payload)
    }
}

impl Default for Recording {
    fn default() -> Self {
        Recording::new(COMPARE_FPS)
    }
}

/// Recording buffer with a single active session
#[derive(Debug)]
pub struct RecordingBuffer {
    config: RecordingConfig,
    recording: Recording,
    /// Set while a recording session is active
    started_at: Option<MotionTime>,
}

impl RecordingBuffer {
    pub fn new(config: RecordingConfig) -> Self {
        RecordingBuffer {
            recording: Recording::new(config.fps),
            config,
            started_at: None,
        }
    }

    /// Clear and begin a new recording
    pub fn start(&mut self, now: MotionTime) {
        self.recording = Recording::new(self.config.fps);
        self.started_at = Some(now);
    }

    /// Append one frame; ignored when not recording
    pub fn append(&mut self, landmarks: LandmarkSet, angles: Option<AngleMapping>) -> bool {
        if self.started_at.is_none() {
            return false;
        }
        self.recording.push(landmarks, angles);
        true
    }

    /// End the active recording; `None` when not recording
    pub fn stop(&mut self) -> Option<usize> {
        self.started_at.take()?;
        self.recording.reconcile_angles();
        Some(self.recording.len())
    }

    /// True once the active recording has run for the maximum duration
    pub fn is_expired(&self, now: MotionTime) -> bool {
        self.started_at
            .is_some_and(|start| now - start >= self.config.max_duration)
    }

    /// Swap in an externally supplied recording, ending any active session
    pub fn replace(&mut self, mut recording: Recording) {
        self.started_at = None;
        recording.reconcile_angles();
        self.recording = recording;
    }

    pub fn is_recording(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn len(&self) -> usize {
        self.recording.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recording.is_empty()
    }

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }
}

impl Default for RecordingBuffer {
    fn default() -> Self {
        Self::new(RecordingConfig::default())
    }
}
