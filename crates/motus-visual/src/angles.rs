//! Joint angle calculation using the dot product
//!
//! Angles are measured in the image plane; depth is ignored because the
//! detector's z estimate is far noisier than x and y.

use motus_core::{AngleMapping, JointAngle, LandmarkSet, Point3D};

/// Smallest vector magnitude used as a divisor
const MAGNITUDE_EPSILON: f32 = 1e-6;

/// Angle ABC in degrees, with B the vertex
///
/// cos(θ) = (v1 · v2) / (|v1| × |v2|), v1 = A - B, v2 = C - B
///
/// Returns a value in [0, 180]. A point coinciding with the vertex does not
/// divide by zero.
pub fn angle_at(vertex: &Point3D, a: &Point3D, c: &Point3D) -> f32 {
    let v1 = (a.x - vertex.x, a.y - vertex.y);
    let v2 = (c.x - vertex.x, c.y - vertex.y);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let mag1 = v1.0.hypot(v1.1).max(MAGNITUDE_EPSILON);
    let mag2 = v2.0.hypot(v2.1).max(MAGNITUDE_EPSILON);

    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees().clamp(0.0, 180.0)
}

/// Compute every joint angle of a landmark set
///
/// `None` when no pose is present or the set is too short to hold the body
/// landmarks. Otherwise all joints are present in the result.
pub fn compute_angles(landmarks: Option<&LandmarkSet>) -> Option<AngleMapping> {
    let landmarks = landmarks?;
    if !landmarks.covers_body() {
        return None;
    }

    JointAngle::all()
        .iter()
        .map(|&joint| {
            let (a, vertex, c) = joint.triple();
            let degrees = angle_at(
                landmarks.landmark(vertex)?,
                landmarks.landmark(a)?,
                landmarks.landmark(c)?,
            );
            Some((joint, degrees))
        })
        .collect()
}
