//! MOTUS Time - Clocks and playback synchronization
//!
//! This crate implements:
//! - τm clocks: a monotonic OS-backed clock and a manually driven clock
//! - The playback synchronizer, which maps elapsed τm to a recorded frame
//!   index at a fixed rate, looping the recording

pub mod clock;
pub mod sync;

pub use clock::*;
pub use sync::*;
