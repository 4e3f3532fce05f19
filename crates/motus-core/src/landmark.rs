//! Landmark State - body points as produced by the pose detector
//!
//! A landmark set is one detector result for one video frame. The index of a
//! point is its identity and never changes within a session.

use serde::{Deserialize, Deserializer, Serialize};

/// Number of landmarks emitted by the body-tracking detector
pub const LANDMARK_COUNT: usize = 33;

/// Body landmarks used by the engine, with their detector indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLandmark {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyLandmark {
    /// All tracked body landmarks in index order
    pub fn all() -> &'static [BodyLandmark] {
        &[
            BodyLandmark::LeftShoulder,
            BodyLandmark::RightShoulder,
            BodyLandmark::LeftElbow,
            BodyLandmark::RightElbow,
            BodyLandmark::LeftWrist,
            BodyLandmark::RightWrist,
            BodyLandmark::LeftHip,
            BodyLandmark::RightHip,
            BodyLandmark::LeftKnee,
            BodyLandmark::RightKnee,
            BodyLandmark::LeftAnkle,
            BodyLandmark::RightAnkle,
        ]
    }

    /// Detector index of this landmark
    pub fn index(self) -> usize {
        match self {
            BodyLandmark::LeftShoulder => 11,
            BodyLandmark::RightShoulder => 12,
            BodyLandmark::LeftElbow => 13,
            BodyLandmark::RightElbow => 14,
            BodyLandmark::LeftWrist => 15,
            BodyLandmark::RightWrist => 16,
            BodyLandmark::LeftHip => 23,
            BodyLandmark::RightHip => 24,
            BodyLandmark::LeftKnee => 25,
            BodyLandmark::RightKnee => 26,
            BodyLandmark::LeftAnkle => 27,
            BodyLandmark::RightAnkle => 28,
        }
    }

    /// Highest index referenced by any body landmark
    pub fn max_index() -> usize {
        28
    }
}

/// A single normalized 3D point with detector confidence
///
/// x and y are in [0,1] relative to the frame, z is depth-relative.
/// Non-finite coordinates are written as JSON `null` and read back as NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    #[serde(deserialize_with = "nan_if_null")]
    pub x: f32,
    #[serde(deserialize_with = "nan_if_null")]
    pub y: f32,
    #[serde(deserialize_with = "nan_if_null")]
    pub z: f32,
    #[serde(default, deserialize_with = "nan_if_null")]
    pub visibility: f32,
}

/// JSON has no NaN; serde_json writes non-finite floats as `null`
fn nan_if_null<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
}

impl Point3D {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Fully visible point
    pub fn visible(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// Euclidean distance in normalized 3D space
    pub fn distance(&self, other: &Point3D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Move `t` of the way toward `other` (x, y, z only)
    pub fn lerp(&self, other: &Point3D, t: f32) -> Point3D {
        Point3D {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
            visibility: self.visibility,
        }
    }
}

/// One detector result: an ordered set of landmarks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Point3D>);

impl LandmarkSet {
    pub fn new(points: Vec<Point3D>) -> Self {
        Self(points)
    }

    /// A set of `len` identical points
    pub fn filled(len: usize, point: Point3D) -> Self {
        Self(vec![point; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Point3D> {
        self.0.get(index)
    }

    /// Get a body landmark by name
    pub fn landmark(&self, landmark: BodyLandmark) -> Option<&Point3D> {
        self.0.get(landmark.index())
    }

    /// Set a point; ignored when out of range
    pub fn set(&mut self, index: usize, point: Point3D) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = point;
        }
    }

    pub fn points(&self) -> &[Point3D] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3D> {
        self.0.iter()
    }

    /// True when every body landmark index is present
    pub fn covers_body(&self) -> bool {
        self.0.len() > BodyLandmark::max_index()
    }
}

impl From<Vec<Point3D>> for LandmarkSet {
    fn from(points: Vec<Point3D>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point3D> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Point3D>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
