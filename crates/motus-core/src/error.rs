//! Error types for MOTUS

use thiserror::Error;

/// Core MOTUS errors
///
/// None of these are fatal to the frame loop. Absent input is modelled as
/// `Option::None`, not as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MotusError {
    // Comparison errors
    #[error("No recording to compare against")]
    EmptyRecording,

    #[error("No live stream is active")]
    NoLiveStream,

    // Recording errors
    #[error("Camera is not running")]
    CameraNotRunning,

    #[error("A recording is already in progress")]
    RecordingInProgress,

    // Import errors
    #[error("Invalid recording: missing frames")]
    MissingFrames,

    #[error("Invalid recording payload: {0}")]
    InvalidPayload(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MotusError {
    fn from(err: std::io::Error) -> Self {
        MotusError::Io(err.to_string())
    }
}

/// Result type for MOTUS operations
pub type MotusResult<T> = Result<T, MotusError>;
