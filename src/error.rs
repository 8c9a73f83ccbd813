use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by session and calibration transitions.
///
/// Every transition either fully applies or fails with one of these without
/// touching state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
    #[error("image has zero width or height")]
    InvalidImage,

    #[error("no image loaded")]
    NoImageLoaded,

    #[error("calibration already in progress")]
    CalibrationInProgress,

    #[error("calibration is not active")]
    CalibrationNotActive,

    #[error("image file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("unsupported image format in {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },
}
