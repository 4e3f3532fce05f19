//! MOTUS Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the MOTUS engine:
//! - Landmarks (Point3D, LandmarkSet) and the body landmark index map
//! - Joint angles (JointAngle, AngleMapping)
//! - Time primitives (MotionTime)
//! - Errors

pub mod angle;
pub mod error;
pub mod landmark;
pub mod time;

pub use angle::*;
pub use error::*;
pub use landmark::*;
pub use time::*;
