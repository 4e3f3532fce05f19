//! Joint angle identifiers and angle mappings

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::BodyLandmark;

/// A measured joint angle; the joint it is named after is the vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JointAngle {
    LeftElbow,
    RightElbow,
    LeftKnee,
    RightKnee,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
}

impl JointAngle {
    /// All joint angles in measurement order
    pub fn all() -> &'static [JointAngle] {
        &[
            JointAngle::LeftElbow,
            JointAngle::RightElbow,
            JointAngle::LeftKnee,
            JointAngle::RightKnee,
            JointAngle::LeftShoulder,
            JointAngle::RightShoulder,
            JointAngle::LeftHip,
            JointAngle::RightHip,
        ]
    }

    /// Number of joint angles
    pub fn count() -> usize {
        8
    }

    /// Landmark triple (a, vertex, c) defining this angle
    pub fn triple(self) -> (BodyLandmark, BodyLandmark, BodyLandmark) {
        use BodyLandmark::*;
        match self {
            JointAngle::LeftElbow => (LeftShoulder, LeftElbow, LeftWrist),
            JointAngle::RightElbow => (RightShoulder, RightElbow, RightWrist),
            JointAngle::LeftKnee => (LeftHip, LeftKnee, LeftAnkle),
            JointAngle::RightKnee => (RightHip, RightKnee, RightAnkle),
            JointAngle::LeftShoulder => (LeftElbow, LeftShoulder, LeftHip),
            JointAngle::RightShoulder => (RightElbow, RightShoulder, RightHip),
            JointAngle::LeftHip => (LeftShoulder, LeftHip, LeftKnee),
            JointAngle::RightHip => (RightShoulder, RightHip, RightKnee),
        }
    }

    /// Wire name, as used in exported recordings
    pub fn name(self) -> &'static str {
        match self {
            JointAngle::LeftElbow => "leftElbow",
            JointAngle::RightElbow => "rightElbow",
            JointAngle::LeftKnee => "leftKnee",
            JointAngle::RightKnee => "rightKnee",
            JointAngle::LeftShoulder => "leftShoulder",
            JointAngle::RightShoulder => "rightShoulder",
            JointAngle::LeftHip => "leftHip",
            JointAngle::RightHip => "rightHip",
        }
    }
}

impl std::fmt::Display for JointAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Joint angles in degrees, [0, 180]
///
/// A mapping produced from a live landmark set always holds every joint.
/// Imported mappings may be partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AngleMapping(BTreeMap<JointAngle, f32>);

// Undefined angles are exported as `null`
impl<'de> Deserialize<'de> for AngleMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<JointAngle, Option<f32>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(joint, degrees)| (joint, degrees.unwrap_or(f32::NAN)))
            .collect())
    }
}

impl AngleMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, joint: JointAngle) -> Option<f32> {
        self.0.get(&joint).copied()
    }

    pub fn insert(&mut self, joint: JointAngle, degrees: f32) {
        self.0.insert(joint, degrees);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, joint: JointAngle) -> bool {
        self.0.contains_key(&joint)
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointAngle, f32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn joints(&self) -> impl Iterator<Item = JointAngle> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(JointAngle, f32)> for AngleMapping {
    fn from_iter<I: IntoIterator<Item = (JointAngle, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_vertex_is_named_joint() {
        let (_, vertex, _) = JointAngle::LeftKnee.triple();
        assert_eq!(vertex, BodyLandmark::LeftKnee);

        let (a, vertex, c) = JointAngle::RightShoulder.triple();
        assert_eq!(a, BodyLandmark::RightElbow);
        assert_eq!(vertex, BodyLandmark::RightShoulder);
        assert_eq!(c, BodyLandmark::RightHip);
    }

    #[test]
    fn test_all_joints_count() {
        assert_eq!(JointAngle::all().len(), JointAngle::count());
    }

    #[test]
    fn test_mapping_uses_wire_names() {
        let mapping: AngleMapping = [(JointAngle::LeftElbow, 90.0), (JointAngle::RightHip, 170.5)]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&mapping).unwrap();
        assert!(json.contains("\"leftElbow\":90.0"));
        assert!(json.contains("\"rightHip\":170.5"));

        let back: AngleMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }

    #[test]
    fn test_null_angle_reads_as_nan() {
        let back: AngleMapping =
            serde_json::from_str(r#"{"leftElbow": null, "leftKnee": 45.0}"#).unwrap();

        assert!(back.get(JointAngle::LeftElbow).unwrap().is_nan());
        assert_eq!(back.get(JointAngle::LeftKnee), Some(45.0));
    }
}
