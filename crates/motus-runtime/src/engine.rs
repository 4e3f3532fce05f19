//! MOTUS Engine - per-frame orchestration of one capture session

use motus_core::{AngleMapping, LandmarkSet, MotusError, MotusResult};
use motus_time::{Clock, MonotonicClock, PlaybackSynchronizer};
use motus_visual::{compute_angles, diff, AngleDiff, Stabilizer};

use crate::{DiffReport, DiffReporter, EngineConfig, Recording, RecordingBuffer, StopReason};

/// Who is in front of the camera
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Role {
    /// Records the reference motion
    #[default]
    Instructor,
    /// Follows a recorded motion
    Student,
}

/// A recording that ended during a tick or call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordingStopped {
    pub reason: StopReason,
    pub frames: usize,
}

/// Everything the renderer needs for one frame
#[derive(Clone, Debug, Default)]
pub struct FrameOutput {
    /// Stabilized live landmarks
    pub live: Option<LandmarkSet>,
    /// Joint angles of the live pose
    pub live_angles: Option<AngleMapping>,
    /// Reference frame to overlay
    pub overlay: Option<LandmarkSet>,
    /// Index of `overlay` in the recording
    pub overlay_index: Option<usize>,
    /// Live minus reference, while comparing
    pub diff: Option<AngleDiff>,
    /// Divergence report, when one was due
    pub report: Option<DiffReport>,
    /// Set on the tick a recording auto-stopped
    pub recording_stopped: Option<RecordingStopped>,
}

/// Runtime counters
#[derive(Clone, Debug, Default)]
pub struct EngineStats {
    pub ticks: u64,
    pub frames_without_pose: u64,
    pub frames_recorded: u64,
    pub reports: u64,
}

/// Motion engine for one session
///
/// Lifecycle: `new` → configure (`set_role`, `set_window_size`) →
/// `start_camera` → `tick` once per frame → `stop_camera` / drop.
pub struct MotionEngine<C: Clock = MonotonicClock> {
    config: EngineConfig,
    clock: C,
    role: Role,
    camera_running: bool,
    stabilizer: Stabilizer,
    buffer: RecordingBuffer,
    sync: PlaybackSynchronizer,
    reporter: DiffReporter,
    stats: EngineStats,
}

impl MotionEngine<MonotonicClock> {
    /// Engine on the OS monotonic clock with default configuration
    pub fn new() -> Self {
        Self::with_clock(EngineConfig::default(), MonotonicClock::new())
    }
}

impl Default for MotionEngine<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MotionEngine<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        let config = config.sanitized();
        MotionEngine {
            stabilizer: Stabilizer::with_config(config.stabilizer()),
            buffer: RecordingBuffer::new(config.recording()),
            sync: PlaybackSynchronizer::with_config(config.sync()),
            reporter: DiffReporter::new(config.report_interval()),
            stats: EngineStats::default(),
            role: Role::default(),
            camera_running: false,
            config,
            clock,
        }
    }

    pub fn set_role(&mut self, role: Role) {
        if role != self.role {
            tracing::info!(?role, "role changed");
            self.role = role;
        }
    }

    /// Resize the smoothing window; clears smoothing state
    pub fn set_window_size(&mut self, window_size: usize) {
        self.stabilizer.configure(window_size);
        self.config.window_size = self.stabilizer.window_size();
    }

    /// Mark the live stream as running
    pub fn start_camera(&mut self) {
        if self.camera_running {
            return;
        }
        self.camera_running = true;
        self.stabilizer.reset();
        tracing::info!("camera started");
    }

    /// Stop the live stream, ending recording and comparison
    pub fn stop_camera(&mut self) -> Option<RecordingStopped> {
        if !self.camera_running {
            return None;
        }
        let stopped = self.finish_recording(StopReason::CameraStopped);
        self.stop_comparison();
        self.stabilizer.reset();
        self.camera_running = false;
        tracing::info!("camera stopped");
        stopped
    }

    /// Clear the recording and start capturing
    pub fn start_recording(&mut self) -> MotusResult<()> {
        if !self.camera_running {
            tracing::warn!("recording rejected: camera not running");
            return Err(MotusError::CameraNotRunning);
        }
        self.stop_comparison();
        self.buffer.start(self.clock.now());
        tracing::info!(
            max_ms = self.buffer.config().max_duration.as_millis() as u64,
            "recording started"
        );
        Ok(())
    }

    /// Stop capturing; `None` when no recording was active
    pub fn stop_recording(&mut self) -> Option<RecordingStopped> {
        self.finish_recording(StopReason::Manual)
    }

    fn finish_recording(&mut self, reason: StopReason) -> Option<RecordingStopped> {
        let frames = self.buffer.stop()?;
        tracing::info!(frames, "recording {}", reason);
        Some(RecordingStopped { reason, frames })
    }

    /// Start looping playback of the recording against the live stream
    pub fn start_comparison(&mut self) -> MotusResult<()> {
        if self.buffer.is_recording() {
            tracing::warn!("comparison rejected: recording in progress");
            return Err(MotusError::RecordingInProgress);
        }
        let frames = self.buffer.len();
        if let Err(e) = self.sync.start(frames, self.camera_running, self.clock.now()) {
            tracing::warn!(error = %e, "comparison rejected");
            return Err(e);
        }
        self.reporter.reset();
        tracing::info!(frames, fps = self.sync.config().fps, "comparison started");
        Ok(())
    }

    pub fn stop_comparison(&mut self) {
        if self.sync.is_active() {
            self.sync.stop();
            tracing::info!("comparison stopped");
        }
    }

    /// Replace the recording with an imported one
    ///
    /// On error nothing changes.
    pub fn import_recording(&mut self, json: &str) -> MotusResult<usize> {
        if self.buffer.is_recording() {
            return Err(MotusError::RecordingInProgress);
        }
        let recording = Recording::import_json(json).map_err(|e| {
            tracing::warn!(error = %e, "import rejected");
            e
        })?;
        self.load_recording(recording);
        Ok(self.buffer.len())
    }

    /// Replace the recording with one built in memory
    pub fn load_recording(&mut self, recording: Recording) {
        self.stop_comparison();
        self.buffer.replace(recording);
        tracing::info!(frames = self.buffer.len(), "recording loaded");
    }

    /// Serialize the current recording
    pub fn export_recording(&self) -> MotusResult<String> {
        if self.buffer.is_empty() {
            return Err(MotusError::EmptyRecording);
        }
        let json = self.buffer.recording().export_json()?;
        tracing::info!(frames = self.buffer.len(), bytes = json.len(), "recording exported");
        Ok(json)
    }

    /// Process one detector result
    ///
    /// Never fails; an absent or degenerate pose only yields `None` fields.
    pub fn tick(&mut self, raw: Option<&LandmarkSet>) -> FrameOutput {
        if !self.camera_running {
            return FrameOutput::default();
        }
        let now = self.clock.now();
        self.stats.ticks += 1;

        if let Some(raw) = raw.filter(|r| r.len() != self.config.landmark_count) {
            tracing::debug!(
                expected = self.config.landmark_count,
                got = raw.len(),
                "unexpected landmark count"
            );
        }

        // 1-2. Stabilize and measure
        let live = self.stabilizer.push(raw);
        if live.is_none() {
            self.stats.frames_without_pose += 1;
        }
        let live_angles = compute_angles(live.as_ref());

        // 3. Advance playback
        let frame_count = self.buffer.len();
        if self.sync.is_active() && self.sync.advance(now, frame_count).is_none() {
            tracing::info!("comparison stopped: recording is empty");
        }

        // 4. Reference overlay
        let overlay_index = (frame_count > 0).then(|| self.sync.display_index());
        let overlay = overlay_index.and_then(|i| self.buffer.recording().frame(i).cloned());

        // 5. Capture
        if self.buffer.is_recording() && self.role == Role::Instructor {
            if let Some(landmarks) = &live {
                self.buffer.append(landmarks.clone(), live_angles.clone());
                self.stats.frames_recorded += 1;
            }
        }

        // 6. Auto-stop
        let recording_stopped = if self.buffer.is_expired(now) {
            self.finish_recording(StopReason::Completed)
        } else {
            None
        };

        // 7. Difference; only a student's divergence is reported
        let (diff, report) = if self.sync.is_active() {
            let index = self.sync.current_index();
            let reference = self.buffer.recording().angles_at(index);
            let delta = diff(live_angles.as_ref(), reference);
            let report = delta
                .as_ref()
                .filter(|_| self.role == Role::Student)
                .and_then(|d| self.reporter.observe(now, d, index, frame_count));
            (delta, report)
        } else {
            (None, None)
        };
        if report.is_some() {
            self.stats.reports += 1;
        }

        FrameOutput {
            live,
            live_angles,
            overlay,
            overlay_index,
            diff,
            report,
            recording_stopped,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_camera_running(&self) -> bool {
        self.camera_running
    }

    pub fn is_recording(&self) -> bool {
        self.buffer.is_recording()
    }

    pub fn is_comparing(&self) -> bool {
        self.sync.is_active()
    }

    pub fn recording(&self) -> &Recording {
        self.buffer.recording()
    }

    /// Reference frame for display outside of `tick`
    pub fn overlay_frame(&self) -> Option<&LandmarkSet> {
        self.buffer.recording().frame(self.sync.display_index())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
