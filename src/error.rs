//! Error types for the window-capture library

use thiserror::Error;

/// Main error type for window enumeration and capture operations
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No backend exists for the requested operating system family
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Backend family is known but has no implementation
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// No window matched the lookup
    #[error("Window not found: {0}")]
    WindowNotFound(String),

    /// Capture operation failed
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    /// Permission denied for screen capture
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Window enumeration failed
    #[error("Failed to enumerate windows: {0}")]
    WindowEnumerationFailed(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Image conversion or encoding error
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Combined result type for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

impl CaptureError {
    /// Check if the caller can reasonably recover (pick another window, retry the lookup)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CaptureError::WindowNotFound(_))
    }

    /// Check if the error means no backend can ever serve this process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CaptureError::UnsupportedPlatform(_) | CaptureError::NotImplemented(_)
        )
    }
}
