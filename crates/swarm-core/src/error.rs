use thiserror::Error;

/// Errors raised by the swarm core and its external collaborators.
///
/// Only [`SwarmError::CameraUnavailable`] is fatal; everything else is
/// logged and swallowed by the camera-tick pipeline.
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("camera permission denied or not available: {0}")]
    CameraUnavailable(String),

    #[error("camera frame is empty ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    #[error("luminance sampling failed: {0}")]
    Sampling(String),

    #[error("hand detector error: {0}")]
    Detector(String),

    #[error("camera pipeline stopped")]
    PipelineStopped,
}

impl SwarmError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, SwarmError::CameraUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, SwarmError>;
