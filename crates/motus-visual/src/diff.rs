//! Pose difference between a live and a reference angle mapping

use std::collections::{BTreeMap, BTreeSet};

use motus_core::{AngleMapping, JointAngle};

/// Signed per-joint difference, live - reference, in degrees
///
/// Only joints with a finite value on both sides are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AngleDiff(BTreeMap<JointAngle, f32>);

impl AngleDiff {
    pub fn get(&self, joint: JointAngle) -> Option<f32> {
        self.0.get(&joint).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointAngle, f32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Mean absolute difference across present joints
    pub fn mean_abs(&self) -> f32 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.0.values().map(|d| d.abs()).sum::<f32>() / self.0.len() as f32
    }

    /// Joint with the largest absolute difference
    pub fn max_abs(&self) -> Option<(JointAngle, f32)> {
        self.iter()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    }
}

/// Compare live angles against a reference
///
/// Returns `None` when either side is absent or no joint is comparable.
pub fn diff(live: Option<&AngleMapping>, reference: Option<&AngleMapping>) -> Option<AngleDiff> {
    let (live, reference) = (live?, reference?);

    let joints: BTreeSet<JointAngle> = live.joints().chain(reference.joints()).collect();
    let out: BTreeMap<JointAngle, f32> = joints
        .into_iter()
        .filter_map(|joint| {
            let l = live.get(joint).filter(|v| v.is_finite())?;
            let r = reference.get(joint).filter(|v| v.is_finite())?;
            Some((joint, l - r))
        })
        .collect();

    if out.is_empty() {
        None
    } else {
        Some(AngleDiff(out))
    }
}
