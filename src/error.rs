//! Error types for the tuning session

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, TunerError>;

/// Errors that can occur while setting up or running a tuning session
#[derive(Error, Debug)]
pub enum TunerError {
    /// Filesystem failure (output directory, frame writes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The frame source could not be opened
    #[error("Failed to open source {source_id}: {reason}")]
    SourceOpen {
        /// Device index or path that was requested
        source_id: String,
        /// Why it failed
        reason: String,
    },

    /// The QR detector failed on a frame
    #[error("Detector failed: {0}")]
    Detector(String),

    /// The display sink failed
    #[error("Display error: {0}")]
    Display(String),

    /// Invalid session configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// OpenCV backend failure
    #[cfg(feature = "camera")]
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
}

impl TunerError {
    /// Build a source-open error
    pub fn source_open<S: Into<String>, R: Into<String>>(source_id: S, reason: R) -> Self {
        Self::SourceOpen {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    /// Build a detector error
    pub fn detector<S: Into<String>>(msg: S) -> Self {
        Self::Detector(msg.into())
    }

    /// Build a display error
    pub fn display<S: Into<String>>(msg: S) -> Self {
        Self::Display(msg.into())
    }

    /// Build a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}
