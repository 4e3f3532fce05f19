//! Stabilizer - temporal smoothing of landmark streams
//!
//! Detector output jitters frame to frame. A plain moving average lags real
//! motion, so the window mean is blended toward the previous output by an
//! amount that grows with the distance moved: small moves are damped, large
//! moves pass through almost immediately.

use std::collections::VecDeque;

use motus_core::{LandmarkSet, Point3D};

/// Motion below this normalized distance is treated as detector noise
pub const JITTER_RADIUS: f32 = 0.0125;

/// Fraction of the way the output always moves toward the new mean
pub const MIN_BLEND: f32 = 0.2;

/// Default sliding window size
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Stabilizer configuration
#[derive(Debug, Clone)]
pub struct StabilizerConfig {
    /// Number of raw frames averaged (≥ 1)
    pub window_size: usize,
    /// Noise threshold in normalized frame units
    pub jitter_radius: f32,
    /// Minimum blend toward the new mean, [0, 1]
    pub min_blend: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        StabilizerConfig {
            window_size: DEFAULT_WINDOW_SIZE,
            jitter_radius: JITTER_RADIUS,
            min_blend: MIN_BLEND,
        }
    }
}

impl StabilizerConfig {
    pub fn with_window_size(window_size: usize) -> Self {
        StabilizerConfig {
            window_size,
            ..Default::default()
        }
    }

    /// Coerce out-of-range values to usable ones
    fn sanitized(mut self) -> Self {
        self.window_size = self.window_size.max(1);
        if !self.jitter_radius.is_finite() || self.jitter_radius <= 0.0 {
            self.jitter_radius = JITTER_RADIUS;
        }
        if !self.min_blend.is_finite() {
            self.min_blend = MIN_BLEND;
        }
        self.min_blend = self.min_blend.clamp(0.0, 1.0);
        self
    }
}

/// Landmark stabilizer
#[derive(Debug)]
pub struct Stabilizer {
    config: StabilizerConfig,
    /// Last `window_size` raw sets, oldest first
    window: VecDeque<LandmarkSet>,
    /// Last emitted set
    last_output: Option<LandmarkSet>,
}

impl Stabilizer {
    pub fn new() -> Self {
        Self::with_config(StabilizerConfig::default())
    }

    pub fn with_config(config: StabilizerConfig) -> Self {
        let config = config.sanitized();
        Stabilizer {
            window: VecDeque::new(),
            last_output: None,
            config,
        }
    }

    /// Change the window size; clears all state
    pub fn configure(&mut self, window_size: usize) {
        if window_size == 0 {
            tracing::warn!("stabilizer window size 0 coerced to 1");
        }
        self.config.window_size = window_size.max(1);
        self.reset();
    }

    /// Clear the window and the last output
    pub fn reset(&mut self) {
        self.window.clear();
        self.last_output = None;
    }

    /// Feed one detector result
    ///
    /// `None` (no pose this frame) is passed through without touching state.
    pub fn push(&mut self, raw: Option<&LandmarkSet>) -> Option<LandmarkSet> {
        let raw = raw?;

        // Landmark identity is positional; a set of a different shape cannot
        // be averaged with the current window.
        if self.window.front().is_some_and(|w| w.len() != raw.len()) {
            tracing::debug!(
                expected = self.window.front().map(LandmarkSet::len),
                got = raw.len(),
                "landmark count changed, resetting stabilizer"
            );
            self.reset();
        }

        self.window.push_back(raw.clone());
        while self.window.len() > self.config.window_size {
            self.window.pop_front();
        }

        let averaged = self.average()?;
        let output: LandmarkSet = match &self.last_output {
            Some(prev) => averaged
                .iter()
                .enumerate()
                .map(|(i, point)| match prev.get(i) {
                    Some(p) => self.damp(point, p),
                    None => *point,
                })
                .collect(),
            None => averaged,
        };

        self.last_output = Some(output.clone());
        Some(output)
    }

    /// Per-landmark mean of every field over the window
    fn average(&self) -> Option<LandmarkSet> {
        let first = self.window.front()?;
        let n = self.window.len() as f32;
        let mut sum = vec![Point3D::default(); first.len()];

        for frame in &self.window {
            for (acc, p) in sum.iter_mut().zip(frame.iter()) {
                acc.x += p.x;
                acc.y += p.y;
                acc.z += p.z;
                acc.visibility += p.visibility;
            }
        }

        Some(
            sum.into_iter()
                .map(|p| Point3D::new(p.x / n, p.y / n, p.z / n, p.visibility / n))
                .collect(),
        )
    }

    /// Blend the window mean toward the previous output
    fn damp(&self, averaged: &Point3D, prev: &Point3D) -> Point3D {
        let dist = averaged.distance(prev);
        if !dist.is_finite() {
            return *averaged;
        }

        let ratio = (dist / self.config.jitter_radius).min(1.0);
        let blend = self.config.min_blend + (1.0 - self.config.min_blend) * ratio;

        let mut out = prev.lerp(averaged, blend);
        out.visibility = (prev.visibility + averaged.visibility) / 2.0;
        out
    }

    /// Current number of raw sets in the window
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn window_size(&self) -> usize {
        self.config.window_size
    }

    pub fn last_output(&self) -> Option<&LandmarkSet> {
        self.last_output.as_ref()
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }
}

impl Default for Stabilizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single(x: f32, y: f32, z: f32) -> LandmarkSet {
        LandmarkSet::new(vec![Point3D::visible(x, y, z)])
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_identical_pushes_hold_position() {
        let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(5));
        let frame = single(0.5, 0.5, 0.0);

        let mut out = None;
        for _ in 0..5 {
            out = stab.push(Some(&frame));
        }

        let p = *out.unwrap().get(0).unwrap();
        assert!(close(p.x, 0.5) && close(p.y, 0.5) && close(p.z, 0.0));
        assert_eq!(stab.window_len(), 5);
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut stab = Stabilizer::new();
        let frame = single(0.3, 0.7, -0.1);

        let out = stab.push(Some(&frame)).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_none_does_not_touch_state() {
        let mut stab = Stabilizer::new();
        stab.push(Some(&single(0.2, 0.2, 0.0)));
        let before = stab.last_output().cloned();

        assert!(stab.push(None).is_none());
        assert_eq!(stab.last_output().cloned(), before);
        assert_eq!(stab.window_len(), 1);
    }

    #[test]
    fn test_small_motion_is_damped() {
        let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(1));
        stab.push(Some(&single(0.5, 0.5, 0.0)));

        // Well under the jitter radius: moves slightly more than MIN_BLEND
        let out = stab.push(Some(&single(0.501, 0.5, 0.0))).unwrap();
        let x = out.get(0).unwrap().x;
        let ratio = 0.001 / JITTER_RADIUS;
        let blend = MIN_BLEND + (1.0 - MIN_BLEND) * ratio;
        assert!(close(x, 0.5 + 0.001 * blend));
        assert!(x > 0.5 && x < 0.501);
    }

    #[test]
    fn test_large_motion_tracks_immediately() {
        let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(1));
        stab.push(Some(&single(0.1, 0.1, 0.0)));

        let out = stab.push(Some(&single(0.6, 0.1, 0.0))).unwrap();
        assert!(close(out.get(0).unwrap().x, 0.6));
    }

    #[test]
    fn test_visibility_is_averaged_with_previous() {
        let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(1));
        stab.push(Some(&LandmarkSet::new(vec![Point3D::new(0.5, 0.5, 0.0, 1.0)])));

        let out = stab
            .push(Some(&LandmarkSet::new(vec![Point3D::new(0.5, 0.5, 0.0, 0.0)])))
            .unwrap();
        assert!(close(out.get(0).unwrap().visibility, 0.5));
    }

    #[test]
    fn test_window_mean() {
        let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(2));
        stab.push(Some(&single(0.0, 0.0, 0.0)));
        stab.reset();

        stab.push(Some(&single(0.2, 0.0, 0.0)));
        stab.push(Some(&single(0.4, 0.0, 0.0)));
        assert_eq!(stab.window_len(), 2);

        // Mean 0.3 is 0.1 from the previous 0.2, well beyond the radius
        let out = stab.last_output().unwrap();
        assert!(close(out.get(0).unwrap().x, 0.3));
    }

    #[test]
    fn test_configure_resets_and_coerces() {
        let mut stab = Stabilizer::new();
        stab.push(Some(&single(0.5, 0.5, 0.0)));

        stab.configure(0);
        assert_eq!(stab.window_size(), 1);
        assert_eq!(stab.window_len(), 0);
        assert!(stab.last_output().is_none());
    }

    #[test]
    fn test_nan_input_emits_plain_average() {
        let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(1));
        stab.push(Some(&single(0.5, 0.5, 0.0)));

        let out = stab.push(Some(&single(f32::NAN, 0.5, 0.0))).unwrap();
        assert!(out.get(0).unwrap().x.is_nan());
        assert!(close(out.get(0).unwrap().y, 0.5));
    }

    #[test]
    fn test_landmark_count_change_resets() {
        let mut stab = Stabilizer::new();
        stab.push(Some(&single(0.5, 0.5, 0.0)));
        stab.push(Some(&single(0.5, 0.5, 0.0)));

        let two = LandmarkSet::new(vec![Point3D::visible(0.1, 0.1, 0.0); 2]);
        let out = stab.push(Some(&two)).unwrap();
        assert_eq!(out, two);
        assert_eq!(stab.window_len(), 1);
    }

    #[test]
    fn test_huge_window_size_is_lazy() {
        let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(usize::MAX));
        assert_eq!(stab.window_size(), usize::MAX);

        let frame = single(0.4, 0.6, 0.0);
        assert_eq!(stab.push(Some(&frame)), Some(frame.clone()));
        stab.push(Some(&frame));
        assert_eq!(stab.window_len(), 2);
    }

    #[test]
    fn test_output_not_aliased_with_window() {
        let mut stab = Stabilizer::new();
        let mut out = stab.push(Some(&single(0.5, 0.5, 0.0))).unwrap();
        out.set(0, Point3D::visible(0.9, 0.9, 0.9));

        assert!(close(stab.last_output().unwrap().get(0).unwrap().x, 0.5));
    }

    proptest! {
        #[test]
        fn prop_window_never_exceeds_size(size in 1usize..16, pushes in 0usize..40) {
            let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(size));
            for i in 0..pushes {
                let v = (i % 10) as f32 / 10.0;
                prop_assert!(stab.push(Some(&single(v, v, 0.0))).is_some());
                prop_assert!(stab.window_len() <= size);
            }
        }

        #[test]
        fn prop_zero_motion_no_drift(
            x in 0.0f32..1.0, y in 0.0f32..1.0, z in -0.5f32..0.5, size in 1usize..10
        ) {
            let mut stab = Stabilizer::with_config(StabilizerConfig::with_window_size(size));
            let frame = single(x, y, z);
            let mut out = None;
            for _ in 0..size + 2 {
                out = stab.push(Some(&frame));
            }
            let p = *out.unwrap().get(0).unwrap();
            prop_assert!((p.x - x).abs() < 1e-5);
            prop_assert!((p.y - y).abs() < 1e-5);
            prop_assert!((p.z - z).abs() < 1e-5);
        }
    }
}
