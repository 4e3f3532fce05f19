//! MOTUS Runtime - Engine orchestration and frame loop
//!
//! The engine is driven by the host once per displayed frame. Each tick:
//! 1. Stabilize the detector output
//! 2. Compute live joint angles
//! 3. Advance comparison playback
//! 4. Select the reference overlay frame
//! 5. Append to the active recording
//! 6. Stop the recording once its maximum duration is reached
//! 7. Compute and report the live-vs-reference difference
//!
//! Nothing in the engine blocks or spawns threads; stopping anything only
//! flips state consulted on the next tick.

pub mod config;
pub mod engine;
pub mod observability;
pub mod recording;
pub mod report;

pub use config::*;
pub use engine::*;
pub use observability::*;
pub use recording::*;
pub use report::*;
