//! Playback Synchronizer - maps elapsed time to a recorded frame
//!
//! Playback runs at a fixed rate regardless of the rate the recording was
//! captured at, and loops forever: index = floor(elapsed / frame) mod N.

use std::time::Duration;

use motus_core::{MotionTime, MotusError, MotusResult};

/// Default comparison playback rate
pub const COMPARE_FPS: u32 = 30;

/// Synchronizer configuration
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Playback rate in frames per second
    pub fps: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig { fps: COMPARE_FPS }
    }
}

impl SyncConfig {
    pub fn with_fps(fps: u32) -> Self {
        SyncConfig { fps: fps.max(1) }
    }
}

/// Synchronizer state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Active { started_at: MotionTime },
}

/// Frame index reached after `elapsed` at `fps`, wrapped to `frame_count`
///
/// Integer arithmetic keeps frame boundaries exact (2000ms at 30fps is 60).
pub fn frame_index_at(elapsed: Duration, fps: u32, frame_count: usize) -> usize {
    if frame_count == 0 || fps == 0 {
        return 0;
    }
    let frames = elapsed.as_micros() * fps as u128 / 1_000_000;
    (frames % frame_count as u128) as usize
}

/// Playback synchronizer over a recording of `frame_count` frames
#[derive(Debug)]
pub struct PlaybackSynchronizer {
    config: SyncConfig,
    state: SyncState,
    current_index: usize,
}

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    pub fn with_config(config: SyncConfig) -> Self {
        PlaybackSynchronizer {
            config: SyncConfig::with_fps(config.fps),
            state: SyncState::Idle,
            current_index: 0,
        }
    }

    /// Idle → Active
    ///
    /// Rejected without any state change when the recording is empty or no
    /// live stream is running.
    pub fn start(&mut self, frame_count: usize, live_active: bool, now: MotionTime) -> MotusResult<()> {
        if !live_active {
            return Err(MotusError::NoLiveStream);
        }
        if frame_count == 0 {
            return Err(MotusError::EmptyRecording);
        }
        self.state = SyncState::Active { started_at: now };
        self.current_index = 0;
        Ok(())
    }

    /// Active → Idle
    pub fn stop(&mut self) {
        self.state = SyncState::Idle;
        self.current_index = 0;
    }

    /// Recompute the current index; call once per live frame
    ///
    /// Returns `None` when idle. An empty recording forces the synchronizer
    /// back to idle.
    pub fn advance(&mut self, now: MotionTime, frame_count: usize) -> Option<usize> {
        let SyncState::Active { started_at } = self.state else {
            return None;
        };
        if frame_count == 0 {
            self.stop();
            return None;
        }
        self.current_index = frame_index_at(now - started_at, self.config.fps, frame_count);
        Some(self.current_index)
    }

    /// Index computed on the last `advance`
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Frame to show as the reference overlay: the first recorded frame when
    /// idle, the synchronized frame when active
    pub fn display_index(&self) -> usize {
        match self.state {
            SyncState::Idle => 0,
            SyncState::Active { .. } => self.current_index,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SyncState::Active { .. })
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Time after which playback of `frame_count` frames is back at index 0
    pub fn loop_duration(&self, frame_count: usize) -> Duration {
        Duration::from_micros((frame_count as u64 * 1_000_000).div_ceil(self.config.fps as u64))
    }
}

impl Default for PlaybackSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}
