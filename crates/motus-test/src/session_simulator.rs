//! Session Simulator - drives an engine through scripted sessions
//!
//! The engine runs on a manual clock advanced by a fixed frame interval,
//! so capture rate and playback rate can differ freely while staying
//! deterministic.

use std::time::Duration;

use motus_core::{MotionTime, MotusResult};
use motus_runtime::{DiffReport, EngineConfig, FrameOutput, MotionEngine, RecordingStopped, Role};
use motus_time::{Clock, ManualClock};

use crate::PoseGenerator;

/// What happened during one simulated run
#[derive(Clone, Debug, Default)]
pub struct SimulationReport {
    pub ticks: u64,
    pub poses_missing: u64,
    /// Overlay index on every tick that had one
    pub overlay_indices: Vec<usize>,
    pub reports: Vec<DiffReport>,
    /// Largest absolute per-joint difference seen
    pub max_abs_diff: f32,
    pub recording_stopped: Option<RecordingStopped>,
}

impl SimulationReport {
    fn absorb(&mut self, out: &FrameOutput) {
        self.ticks += 1;
        if out.live.is_none() {
            self.poses_missing += 1;
        }
        if let Some(index) = out.overlay_index {
            self.overlay_indices.push(index);
        }
        if let Some(report) = &out.report {
            self.reports.push(report.clone());
        }
        if let Some((_, worst)) = out.diff.as_ref().and_then(|d| d.max_abs()) {
            self.max_abs_diff = self.max_abs_diff.max(worst.abs());
        }
        if out.recording_stopped.is_some() {
            self.recording_stopped = out.recording_stopped;
        }
    }
}

/// One engine, one simulated person in front of the camera
pub struct SessionSimulator {
    engine: MotionEngine<ManualClock>,
    clock: ManualClock,
    generator: PoseGenerator,
    /// Time between detector frames
    frame_interval: Duration,
    /// Motion time origin for the generator
    epoch: MotionTime,
}

impl SessionSimulator {
    pub fn new(config: EngineConfig, generator: PoseGenerator, frame_interval: Duration) -> Self {
        let clock = ManualClock::new();
        let epoch = clock.now();
        SessionSimulator {
            engine: MotionEngine::with_clock(config, clock.clone()),
            clock,
            generator,
            frame_interval,
            epoch,
        }
    }

    /// Simulator capturing at `fps`
    pub fn at_fps(config: EngineConfig, generator: PoseGenerator, fps: u32) -> Self {
        let interval = Duration::from_micros(1_000_000 / fps.max(1) as u64);
        Self::new(config, generator, interval)
    }

    /// Tick once per frame interval for `duration`
    pub fn run_for(&mut self, duration: Duration) -> SimulationReport {
        let mut report = SimulationReport::default();
        let end = self.clock.now() + duration;

        while self.clock.now() < end {
            let t = self.clock.now() - self.epoch;
            let raw = self.generator.sample(t);
            let out = self.engine.tick(raw.as_ref());
            report.absorb(&out);
            self.clock.advance(self.frame_interval);
        }
        report
    }

    /// Instructor records for up to `duration`
    pub fn record_instructor(&mut self, duration: Duration) -> MotusResult<SimulationReport> {
        self.engine.set_role(Role::Instructor);
        self.engine.start_camera();
        self.engine.start_recording()?;
        let mut report = self.run_for(duration);
        if let Some(stopped) = self.engine.stop_recording() {
            report.recording_stopped = Some(stopped);
        }
        Ok(report)
    }

    /// Student follows the loaded recording for `duration`
    pub fn compare_student(&mut self, duration: Duration) -> MotusResult<SimulationReport> {
        self.engine.set_role(Role::Student);
        self.engine.start_camera();
        self.engine.start_comparison()?;
        let report = self.run_for(duration);
        self.engine.stop_comparison();
        Ok(report)
    }

    pub fn engine(&self) -> &MotionEngine<ManualClock> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut MotionEngine<ManualClock> {
        &mut self.engine
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn generator(&self) -> &PoseGenerator {
        &self.generator
    }
}
