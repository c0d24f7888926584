//! macOS window capture implementation on the Quartz window server

mod window_list;

pub use window_list::list_windows;

use crate::{
    capture::{
        reconstruct::reconstruct,
        traits::{CaptureCapabilities, WindowCapture},
    },
    error::{CaptureError, CaptureResult},
    types::{CaptureBuffer, CaptureConfig, PixelFormat, RawFrame, WindowDescriptor},
};

use core_graphics::display::{
    kCGNullWindowID, kCGWindowImageBoundsIgnoreFraming, kCGWindowImageDefault,
    kCGWindowListOptionIncludingWindow, kCGWindowListOptionOnScreenOnly, CGDisplay,
    CGWindowImageOption,
};
use core_graphics::geometry::CGRect;
use core_graphics::image::CGImage;

/// macOS capture backend
pub struct MacCapture {
    config: CaptureConfig,
}

impl MacCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Check if screen recording permission is granted
    pub fn has_permission() -> bool {
        unsafe { CGPreflightScreenCaptureAccess() }
    }

    fn ensure_permission() -> CaptureResult<()> {
        if !Self::has_permission() {
            log::warn!("screen recording permission has not been granted");
            return Err(CaptureError::PermissionDenied(
                "Screen recording permission required. Grant it in System Settings > \
                 Privacy & Security > Screen Recording"
                    .to_string(),
            ));
        }
        Ok(())
    }

    fn window_image_option(&self) -> CGWindowImageOption {
        if self.config.ignore_window_framing {
            kCGWindowImageBoundsIgnoreFraming
        } else {
            kCGWindowImageDefault
        }
    }

    /// Copy the pixels of a CGImage out of its data provider
    fn copy_frame(image: &CGImage) -> CaptureResult<RawFrame> {
        let bits_per_pixel = image.bits_per_pixel();
        if bits_per_pixel != 32 {
            return Err(CaptureError::CaptureFailed(format!(
                "Unsupported pixel format: {}bpp",
                bits_per_pixel
            )));
        }

        let data = image.data();
        // Screen images come back as kCGImageAlphaPremultipliedFirst | kCGBitmapByteOrder32Little
        Ok(RawFrame::new(
            data.bytes().to_vec(),
            image.width() as u32,
            image.height() as u32,
            image.bytes_per_row(),
            PixelFormat::BGRA8,
        ))
    }
}

impl WindowCapture for MacCapture {
    fn enumerate_windows(&self) -> CaptureResult<Vec<WindowDescriptor>> {
        window_list::list_windows(self.config.window_scope)
    }

    fn capture_full_screen(&self) -> CaptureResult<CaptureBuffer> {
        Self::ensure_permission()?;

        let bounds = CGDisplay::main().bounds();
        let image = CGDisplay::screenshot(
            bounds,
            kCGWindowListOptionOnScreenOnly,
            kCGNullWindowID,
            kCGWindowImageDefault,
        )
        .ok_or_else(|| {
            CaptureError::CaptureFailed(
                "CGWindowListCreateImage returned no display image".to_string(),
            )
        })?;

        let raw = Self::copy_frame(&image)?;
        reconstruct(&raw, self.config.output_format)
    }

    fn capture_window(&self, window_id: u32) -> CaptureResult<CaptureBuffer> {
        Self::ensure_permission()?;

        // CGRectNull: the smallest rectangle enclosing the window
        let bounds = unsafe { CGRectNull };
        let image = CGDisplay::screenshot(
            bounds,
            kCGWindowListOptionIncludingWindow,
            window_id,
            self.window_image_option(),
        )
        .ok_or_else(|| {
            CaptureError::CaptureFailed(format!(
                "CGWindowListCreateImage returned no image for window {}",
                window_id
            ))
        })?;

        let raw = Self::copy_frame(&image)?;
        reconstruct(&raw, self.config.output_format)
    }

    fn implementation_name(&self) -> String {
        "macOS CoreGraphics".to_string()
    }

    fn capabilities(&self) -> CaptureCapabilities {
        CaptureCapabilities {
            supports_occluded_windows: true,
            lists_offscreen_windows: true,
            supports_frameless_capture: true,
            requires_permission: true,
        }
    }
}

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    static CGRectNull: CGRect;
    fn CGPreflightScreenCaptureAccess() -> bool;
}
