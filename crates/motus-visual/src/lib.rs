//! MOTUS Visual - Pose processing between detector and renderer
//!
//! Per live frame:
//!
//! raw landmarks → Stabilizer → stabilized landmarks → angles → difference
//!
//! - Stabilizer: sliding-window mean with distance-adaptive jitter damping
//! - Angles: three-point joint angles in the image plane
//! - Difference: signed per-joint divergence against a reference pose

pub mod angles;
pub mod diff;
pub mod stabilizer;

pub use angles::*;
pub use diff::*;
pub use stabilizer::*;
