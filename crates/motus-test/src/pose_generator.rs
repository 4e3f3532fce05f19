//! Synthetic pose generator
//!
//! Produces a standing figure whose left elbow bends and straightens
//! periodically, so tests know the true joint angles at any instant. Noise
//! and dropout imitate a real detector.

use std::time::Duration;

use motus_core::{BodyLandmark, LandmarkSet, Point3D, LANDMARK_COUNT};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Per-coordinate detector noise
#[derive(Clone, Debug)]
pub enum NoiseModel {
    /// Exact positions
    None,
    /// Uniform in [-amplitude, amplitude]
    Uniform { amplitude: f32 },
    /// Gaussian with the given standard deviation
    Normal { stddev: f32 },
}

impl NoiseModel {
    /// Sample one offset
    pub fn sample(&self, rng: &mut StdRng) -> f32 {
        match self {
            NoiseModel::None => 0.0,
            NoiseModel::Uniform { amplitude } => {
                let a = *amplitude;
                if a <= 0.0 {
                    return 0.0;
                }
                Uniform::new_inclusive(-a, a).sample(rng)
            }
            NoiseModel::Normal { stddev } => {
                // Box-Muller transform
                let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
                let u2: f32 = rng.gen();
                let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
                stddev * z
            }
        }
    }
}

/// Generator configuration
#[derive(Clone, Debug)]
pub struct PoseGeneratorConfig {
    /// Detector noise
    pub noise: NoiseModel,
    /// Probability of "no pose" on a frame (0.0 - 1.0)
    pub dropout_rate: f64,
    /// Smallest left elbow angle reached, degrees
    pub min_elbow_deg: f32,
    /// Time for one full bend-and-straighten cycle
    pub period: Duration,
}

impl Default for PoseGeneratorConfig {
    fn default() -> Self {
        PoseGeneratorConfig {
            noise: NoiseModel::None,
            dropout_rate: 0.0,
            min_elbow_deg: 60.0,
            period: Duration::from_secs(2),
        }
    }
}

impl PoseGeneratorConfig {
    /// A figure that does not move
    pub fn still() -> Self {
        PoseGeneratorConfig {
            min_elbow_deg: 180.0,
            ..Default::default()
        }
    }

    /// Typical webcam detector noise
    pub fn noisy() -> Self {
        PoseGeneratorConfig {
            noise: NoiseModel::Normal { stddev: 0.004 },
            dropout_rate: 0.02,
            ..Default::default()
        }
    }
}

const FOREARM_LENGTH: f32 = 0.15;

/// Standing figure, arms hanging straight down
pub fn standing_pose() -> LandmarkSet {
    use BodyLandmark::*;

    let mut set = LandmarkSet::filled(LANDMARK_COUNT, Point3D::visible(0.5, 0.15, 0.0));
    let body = [
        (LeftShoulder, 0.42, 0.30),
        (RightShoulder, 0.58, 0.30),
        (LeftElbow, 0.42, 0.45),
        (RightElbow, 0.58, 0.45),
        (LeftWrist, 0.42, 0.60),
        (RightWrist, 0.58, 0.60),
        (LeftHip, 0.45, 0.60),
        (RightHip, 0.55, 0.60),
        (LeftKnee, 0.45, 0.75),
        (RightKnee, 0.55, 0.75),
        (LeftAnkle, 0.45, 0.90),
        (RightAnkle, 0.55, 0.90),
    ];
    for (landmark, x, y) in body {
        set.set(landmark.index(), Point3D::visible(x, y, 0.0));
    }
    set
}

/// Point at `length` from `vertex`, making `degrees` with the ray vertex→a
pub fn place_at_angle(vertex: &Point3D, a: &Point3D, length: f32, degrees: f32) -> Point3D {
    let (dx, dy) = (a.x - vertex.x, a.y - vertex.y);
    let norm = dx.hypot(dy).max(f32::EPSILON);
    let (ux, uy) = (dx / norm, dy / norm);
    let (sin, cos) = degrees.to_radians().sin_cos();

    Point3D::new(
        vertex.x + length * (ux * cos - uy * sin),
        vertex.y + length * (ux * sin + uy * cos),
        vertex.z,
        vertex.visibility,
    )
}

/// Standing figure with the left elbow bent to `degrees`
pub fn pose_with_left_elbow(degrees: f32) -> LandmarkSet {
    let mut set = standing_pose();
    let shoulder = standing_point(&set, BodyLandmark::LeftShoulder);
    let elbow = standing_point(&set, BodyLandmark::LeftElbow);
    let wrist = place_at_angle(&elbow, &shoulder, FOREARM_LENGTH, degrees);
    set.set(BodyLandmark::LeftWrist.index(), wrist);
    set
}

fn standing_point(set: &LandmarkSet, landmark: BodyLandmark) -> Point3D {
    set.landmark(landmark).copied().unwrap_or_default()
}

/// Seeded synthetic detector
pub struct PoseGenerator {
    config: PoseGeneratorConfig,
    rng: StdRng,
}

impl PoseGenerator {
    pub fn new(config: PoseGeneratorConfig, seed: u64) -> Self {
        PoseGenerator {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Ground-truth left elbow angle at `t`
    pub fn left_elbow_at(&self, t: Duration) -> f32 {
        let period = self.config.period.as_secs_f32().max(f32::EPSILON);
        let phase = (t.as_secs_f32() / period).fract();
        let bend = 0.5 - 0.5 * (2.0 * std::f32::consts::PI * phase).cos();
        180.0 - (180.0 - self.config.min_elbow_deg) * bend
    }

    /// Noise-free pose at `t`
    pub fn clean_pose(&self, t: Duration) -> LandmarkSet {
        pose_with_left_elbow(self.left_elbow_at(t))
    }

    /// Detector output at `t`: noisy, sometimes absent
    pub fn sample(&mut self, t: Duration) -> Option<LandmarkSet> {
        if self.config.dropout_rate > 0.0 && self.rng.gen_bool(self.config.dropout_rate.min(1.0)) {
            return None;
        }
        let clean = self.clean_pose(t);
        let noise = self.config.noise.clone();
        Some(
            clean
                .iter()
                .map(|p| {
                    Point3D::new(
                        p.x + noise.sample(&mut self.rng),
                        p.y + noise.sample(&mut self.rng),
                        p.z + noise.sample(&mut self.rng),
                        p.visibility,
                    )
                })
                .collect(),
        )
    }

    pub fn config(&self) -> &PoseGeneratorConfig {
        &self.config
    }
}
