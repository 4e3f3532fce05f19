//! MOTUS Test Harness - synthetic motion and session simulation
//!
//! This crate provides:
//! - A synthetic pose generator with ground-truth joint angles
//! - Detector noise and dropout models
//! - A session simulator driving the engine on a manual clock

pub mod pose_generator;
pub mod session_simulator;

pub use pose_generator::*;
pub use session_simulator::*;
