//! Window capture module with platform-specific implementations

pub mod reconstruct;
pub mod traits;

#[cfg(target_os = "macos")]
pub mod macos;

pub use traits::{CaptureCapabilities, WindowCapture};

use crate::error::{CaptureError, CaptureResult};
use crate::platform::Platform;
use crate::types::CaptureConfig;

/// Platform-specific capturer factory
pub struct Capturer;

impl Capturer {
    /// Create a capturer for the host platform with default settings
    pub fn new() -> CaptureResult<Box<dyn WindowCapture>> {
        Self::select_backend(&CaptureConfig::default())
    }

    /// Select the backend for `config.platform`
    ///
    /// Nothing is allocated for families without a working backend.
    pub fn select_backend(config: &CaptureConfig) -> CaptureResult<Box<dyn WindowCapture>> {
        config.validate()?;
        log::debug!("selecting capture backend for {}", config.platform);

        match &config.platform {
            Platform::MacOs => Self::macos_backend(config),
            Platform::Windows => Err(CaptureError::NotImplemented(
                "window capture backend for windows".to_string(),
            )),
            other => Err(CaptureError::UnsupportedPlatform(other.to_string())),
        }
    }

    #[cfg(target_os = "macos")]
    fn macos_backend(config: &CaptureConfig) -> CaptureResult<Box<dyn WindowCapture>> {
        Ok(Box::new(macos::MacCapture::new(config.clone())))
    }

    #[cfg(not(target_os = "macos"))]
    fn macos_backend(_config: &CaptureConfig) -> CaptureResult<Box<dyn WindowCapture>> {
        Err(CaptureError::UnsupportedPlatform(format!(
            "macos backend is not available in a {} build",
            std::env::consts::OS
        )))
    }
}
