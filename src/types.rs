//! Core types for window enumeration and capture

use crate::error::{CaptureError, CaptureResult};
use crate::platform::Platform;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Rectangle in window-server coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// A window as reported by the window server at enumeration time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowDescriptor {
    /// Window server identifier
    pub id: u32,
    /// Window title, empty when the window has none
    pub name: String,
    /// Frame in global display coordinates
    pub bounds: Rectangle,
    /// Name of the owning application
    pub owner_name: String,
    /// Window layer (0 for normal application windows)
    pub layer: i32,
    /// Whether the window is currently on screen
    pub is_on_screen: bool,
}

impl WindowDescriptor {
    pub fn new(id: u32, name: impl Into<String>, bounds: Rectangle) -> Self {
        Self {
            id,
            name: name.into(),
            bounds,
            ..Default::default()
        }
    }
}

/// Which windows an enumeration returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowListScope {
    /// Every window of every application, including off-screen and minimized ones
    #[default]
    All,
    /// Only windows currently on screen
    OnScreenOnly,
}

/// Pixel format for frame data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Red, Green, Blue, Alpha (8 bits per channel)
    RGBA8,
    /// Blue, Green, Red, Alpha (8 bits per channel)
    BGRA8,
    /// Red, Green, Blue (8 bits per channel)
    RGB8,
    /// Blue, Green, Red (8 bits per channel)
    BGR8,
}

impl PixelFormat {
    /// Get the number of bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::RGBA8 | PixelFormat::BGRA8 => 4,
            PixelFormat::RGB8 | PixelFormat::BGR8 => 3,
        }
    }

    /// Check if the format has an alpha channel
    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelFormat::RGBA8 | PixelFormat::BGRA8)
    }

    /// Byte offsets of the red, green and blue channels within one pixel
    pub fn rgb_offsets(&self) -> [usize; 3] {
        match self {
            PixelFormat::RGBA8 | PixelFormat::RGB8 => [0, 1, 2],
            PixelFormat::BGRA8 | PixelFormat::BGR8 => [2, 1, 0],
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::RGBA8 => write!(f, "RGBA8"),
            PixelFormat::BGRA8 => write!(f, "BGRA8"),
            PixelFormat::RGB8 => write!(f, "RGB8"),
            PixelFormat::BGR8 => write!(f, "BGR8"),
        }
    }
}

/// Packed 4-byte-per-pixel image as handed over by the OS
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Pixel data, rows possibly padded past `width`
    pub data: Vec<u8>,
    /// Width reported by the OS
    pub width: u32,
    /// Height reported by the OS
    pub height: u32,
    /// Row stride reported by the OS
    pub bytes_per_row: usize,
    /// Native channel order
    pub format: PixelFormat,
}

impl RawFrame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        bytes_per_row: usize,
        format: PixelFormat,
    ) -> Self {
        Self {
            data,
            width,
            height,
            bytes_per_row,
            format,
        }
    }

    /// Get the total size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Tightly packed 3-channel capture result, owned by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureBuffer {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl CaptureBuffer {
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
        }
    }

    pub fn channels(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Shape as (height, width, channels)
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, self.channels())
    }

    /// Get the total size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_valid(&self) -> bool {
        let (h, w, c) = self.dimensions();
        self.data.len() == h * w * c
    }

    /// Get a pixel at the given coordinates
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let channels = self.channels();
        let offset = ((y as usize) * (self.width as usize) + x as usize) * channels;
        self.data.get(offset..offset + channels)
    }

    /// Borrow one row of pixels
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width as usize * self.channels();
        let start = y as usize * stride;
        self.data.get(start..start + stride)
    }

    /// Convert into an `image` buffer in RGB order
    pub fn to_rgb_image(&self) -> CaptureResult<image::RgbImage> {
        let data = match self.format {
            PixelFormat::RGB8 => self.data.clone(),
            PixelFormat::BGR8 => {
                let mut data = self.data.clone();
                for chunk in data.chunks_exact_mut(3) {
                    chunk.swap(0, 2);
                }
                data
            }
            other => {
                return Err(CaptureError::InvalidConfiguration(format!(
                    "capture buffer in {} cannot be converted to RGB",
                    other
                )))
            }
        };

        image::RgbImage::from_raw(self.width, self.height, data).ok_or_else(|| {
            CaptureError::CaptureFailed(format!(
                "buffer of {} bytes does not match {}x{}",
                self.data.len(),
                self.width,
                self.height
            ))
        })
    }

    /// Save to file, format chosen from the extension
    pub fn save(&self, path: impl AsRef<Path>) -> CaptureResult<()> {
        self.to_rgb_image()?.save(path)?;
        Ok(())
    }
}

/// Capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Operating system family the dispatcher selects a backend for
    pub platform: Platform,
    /// Windows returned by enumeration
    pub window_scope: WindowListScope,
    /// Channel order of produced buffers (RGB8 or BGR8)
    pub output_format: PixelFormat,
    /// Capture window contents without the frame and shadow
    pub ignore_window_framing: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            window_scope: WindowListScope::All,
            output_format: PixelFormat::RGB8,
            ignore_window_framing: false,
        }
    }
}

impl CaptureConfig {
    /// Configuration targeting a specific platform family
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CaptureResult<()> {
        if self.output_format.has_alpha() {
            return Err(CaptureError::InvalidConfiguration(format!(
                "output format must be RGB8 or BGR8, got {}",
                self.output_format
            )));
        }
        Ok(())
    }
}

/// Capture statistics
#[derive(Debug, Clone, Default)]
pub struct CaptureStats {
    pub total_captures: u64,
    pub successful_captures: u64,
    pub failed_captures: u64,
    pub total_bytes_captured: u64,
    pub total_capture_time: Duration,
    pub fastest_capture: Duration,
    pub slowest_capture: Duration,
}

impl CaptureStats {
    /// Get success rate as percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_captures == 0 {
            0.0
        } else {
            (self.successful_captures as f64 / self.total_captures as f64) * 100.0
        }
    }

    /// Get average capture time
    pub fn average_capture_time(&self) -> Duration {
        if self.successful_captures == 0 {
            Duration::ZERO
        } else {
            self.total_capture_time / self.successful_captures as u32
        }
    }

    pub(crate) fn record_success(&mut self, bytes: usize, duration: Duration) {
        self.total_captures += 1;
        self.successful_captures += 1;
        self.total_bytes_captured += bytes as u64;
        self.total_capture_time += duration;
        if self.fastest_capture == Duration::ZERO || duration < self.fastest_capture {
            self.fastest_capture = duration;
        }
        if duration > self.slowest_capture {
            self.slowest_capture = duration;
        }
    }

    pub(crate) fn record_failure(&mut self) {
        self.total_captures += 1;
        self.failed_captures += 1;
    }
}
