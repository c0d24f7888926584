//! Window Capture Library
//!
//! Enumerates on-screen windows, locates one by title or identifier, captures
//! it (or the primary display) into a tightly packed RGB buffer, and drives a
//! live preview loop.
//!
//! # Example
//!
//! ```no_run
//! use window_capture::{CaptureConfig, WindowCaptureService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut service = WindowCaptureService::new()?;
//!
//! for window in service.enumerate_windows()? {
//!     println!("{} {:?}", window.id, window.name);
//! }
//!
//! let frame = service.capture_window_by_name("Terminal")?;
//! frame.save("terminal.png")?;
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod capture;
pub mod error;
pub mod platform;
pub mod preview;
pub mod types;

// Re-export main types
pub use capture::{CaptureCapabilities, Capturer, WindowCapture};
pub use error::{CaptureError, CaptureResult};
pub use platform::Platform;
pub use preview::{
    FrameRateMeter, LoopControl, PreviewConfig, PreviewLoop, PreviewStats, PreviewSurface,
    PreviewTarget,
};
pub use types::{
    CaptureBuffer, CaptureConfig, CaptureStats, PixelFormat, RawFrame, Rectangle,
    WindowDescriptor, WindowListScope,
};

use std::time::Instant;

/// Main entry point for window enumeration and capture
pub struct WindowCaptureService {
    backend: Box<dyn WindowCapture>,
    config: CaptureConfig,
    stats: CaptureStats,
}

impl WindowCaptureService {
    /// Create a service for the host platform with default configuration
    pub fn new() -> CaptureResult<Self> {
        Self::with_config(CaptureConfig::default())
    }

    /// Create a service with custom configuration
    pub fn with_config(config: CaptureConfig) -> CaptureResult<Self> {
        let backend = Capturer::select_backend(&config)?;
        Ok(Self::from_backend(backend, config))
    }

    /// Wrap an already constructed backend
    pub fn from_backend(backend: Box<dyn WindowCapture>, config: CaptureConfig) -> Self {
        Self {
            backend,
            config,
            stats: CaptureStats::default(),
        }
    }

    pub fn enumerate_windows(&self) -> CaptureResult<Vec<WindowDescriptor>> {
        self.backend.enumerate_windows()
    }

    pub fn window_names(&self) -> CaptureResult<Vec<String>> {
        self.backend.window_names()
    }

    /// First window titled `name`; `Ok(None)` when nothing matches
    pub fn find_window_by_name(&self, name: &str) -> CaptureResult<Option<WindowDescriptor>> {
        self.backend.find_window_by_name(name)
    }

    pub fn find_window_by_id(&self, window_id: u32) -> CaptureResult<Option<WindowDescriptor>> {
        self.backend.find_window_by_id(window_id)
    }

    /// Capture the primary display
    pub fn capture_full_screen(&mut self) -> CaptureResult<CaptureBuffer> {
        let backend = &self.backend;
        Self::timed(&mut self.stats, || backend.capture_full_screen())
    }

    /// Capture one window by identifier
    pub fn capture_window(&mut self, window_id: u32) -> CaptureResult<CaptureBuffer> {
        let backend = &self.backend;
        Self::timed(&mut self.stats, || backend.capture_window(window_id))
    }

    /// Look a window up by title and capture it
    pub fn capture_window_by_name(&mut self, name: &str) -> CaptureResult<CaptureBuffer> {
        let backend = &self.backend;
        Self::timed(&mut self.stats, || backend.capture_window_by_name(name))
    }

    fn timed<F>(stats: &mut CaptureStats, capture: F) -> CaptureResult<CaptureBuffer>
    where
        F: FnOnce() -> CaptureResult<CaptureBuffer>,
    {
        let start = Instant::now();
        match capture() {
            Ok(buffer) => {
                stats.record_success(buffer.size(), start.elapsed());
                Ok(buffer)
            }
            Err(e) => {
                stats.record_failure();
                Err(e)
            }
        }
    }

    /// Turn the service into a preview loop over its backend
    pub fn into_preview(
        self,
        config: PreviewConfig,
    ) -> CaptureResult<PreviewLoop<Box<dyn WindowCapture>>> {
        PreviewLoop::new(self.backend, config)
    }

    /// Open a preview window and loop until the cancel key is pressed
    #[cfg(feature = "preview")]
    pub fn run_preview_window(self, config: PreviewConfig) -> CaptureResult<PreviewStats> {
        preview::egui_surface::run_preview_window(self.backend, config)
    }

    /// Get the current capture configuration
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Get capture statistics
    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }

    /// Reset capture statistics
    pub fn reset_stats(&mut self) {
        self.stats = CaptureStats::default();
    }

    /// Get the implementation name
    pub fn implementation_name(&self) -> String {
        self.backend.implementation_name()
    }

    pub fn capabilities(&self) -> CaptureCapabilities {
        self.backend.capabilities()
    }
}

/// Convenience function to capture the primary display
pub fn capture_primary_display() -> CaptureResult<CaptureBuffer> {
    WindowCaptureService::new()?.capture_full_screen()
}

/// Convenience function to list windows on the host
pub fn list_windows() -> CaptureResult<Vec<WindowDescriptor>> {
    Capturer::new()?.enumerate_windows()
}

/// Library version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Get library capabilities
pub fn capabilities() -> String {
    let mut caps = Vec::new();

    #[cfg(target_os = "macos")]
    caps.push("macOS CoreGraphics");

    #[cfg(feature = "preview")]
    caps.push("Preview Window");

    if caps.is_empty() {
        caps.push("None");
    }

    caps.join(", ")
}
