//! Pixel reconstruction from OS frame buffers
//!
//! The window server hands back packed 4-byte pixels whose rows may be padded
//! to an alignment boundary. The row width is derived from the byte length,
//! never from the reported stride, and the result is cropped to the logical
//! width before alpha is dropped and channels are reordered.

use crate::{
    error::{CaptureError, CaptureResult},
    types::{CaptureBuffer, PixelFormat, RawFrame},
};

const SOURCE_BYTES_PER_PIXEL: usize = 4;

/// Row width in pixels implied by `len` bytes spread over `height` rows
pub fn derived_row_width(len: usize, height: u32) -> CaptureResult<usize> {
    if height == 0 {
        return Err(CaptureError::CaptureFailed(
            "frame has zero height".to_string(),
        ));
    }

    let bytes_per_row_group = height as usize * SOURCE_BYTES_PER_PIXEL;
    if len % bytes_per_row_group != 0 {
        return Err(CaptureError::CaptureFailed(format!(
            "frame length {} is not a multiple of height {} x {} bytes",
            len, height, SOURCE_BYTES_PER_PIXEL
        )));
    }

    Ok(len / bytes_per_row_group)
}

/// Reconstruct a frame cropped to the width the OS reported for the image
pub fn reconstruct(raw: &RawFrame, output: PixelFormat) -> CaptureResult<CaptureBuffer> {
    reconstruct_cropped(raw, raw.width, output)
}

/// Reconstruct a frame cropped to `logical_width` columns
pub fn reconstruct_cropped(
    raw: &RawFrame,
    logical_width: u32,
    output: PixelFormat,
) -> CaptureResult<CaptureBuffer> {
    if raw.format.bytes_per_pixel() != SOURCE_BYTES_PER_PIXEL {
        return Err(CaptureError::CaptureFailed(format!(
            "expected a 4-channel source frame, got {}",
            raw.format
        )));
    }
    if output.has_alpha() {
        return Err(CaptureError::InvalidConfiguration(format!(
            "output format must be RGB8 or BGR8, got {}",
            output
        )));
    }

    let row_width = derived_row_width(raw.data.len(), raw.height)?;
    if row_width == 0 {
        return Err(CaptureError::CaptureFailed("frame is empty".to_string()));
    }

    if raw.bytes_per_row != row_width * SOURCE_BYTES_PER_PIXEL {
        log::trace!(
            "reported stride {} disagrees with derived row width {} px",
            raw.bytes_per_row,
            row_width
        );
    }

    let width = logical_width as usize;
    if width > row_width {
        return Err(CaptureError::CaptureFailed(format!(
            "logical width {} exceeds row width {}",
            width, row_width
        )));
    }
    if width < row_width {
        log::trace!("cropping {} px of row padding", row_width - width);
    }

    let src = raw.format.rgb_offsets();
    let dst = output.rgb_offsets();
    let channels = output.bytes_per_pixel();
    let mut data = Vec::with_capacity(raw.height as usize * width * channels);

    for row in raw.data.chunks_exact(row_width * SOURCE_BYTES_PER_PIXEL) {
        for pixel in row[..width * SOURCE_BYTES_PER_PIXEL].chunks_exact(SOURCE_BYTES_PER_PIXEL) {
            let mut out = [0u8; 3];
            for channel in 0..3 {
                out[dst[channel]] = pixel[src[channel]];
            }
            data.extend_from_slice(&out);
        }
    }

    Ok(CaptureBuffer::new(data, logical_width, raw.height, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bgra_frame(width: u32, row_width: u32, height: u32) -> RawFrame {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..row_width {
                if x < width {
                    // B, G, R, A
                    data.extend_from_slice(&[x as u8, y as u8, 200, 255]);
                } else {
                    data.extend_from_slice(&[0xEE; 4]);
                }
            }
        }
        RawFrame::new(data, width, height, (row_width * 4) as usize, PixelFormat::BGRA8)
    }

    #[test]
    fn test_derived_row_width() {
        assert_eq!(derived_row_width(100 * 160 * 4, 100).unwrap(), 160);
        assert!(derived_row_width(100 * 160 * 4 + 1, 100).is_err());
        assert!(derived_row_width(16, 0).is_err());
    }

    #[test]
    fn test_bgra_to_rgb() {
        let raw = RawFrame::new(vec![1, 2, 3, 255], 1, 1, 4, PixelFormat::BGRA8);
        let buffer = reconstruct(&raw, PixelFormat::RGB8).unwrap();
        assert_eq!(buffer.data, vec![3, 2, 1]);
    }

    #[test]
    fn test_bgra_to_bgr() {
        let raw = RawFrame::new(vec![1, 2, 3, 255], 1, 1, 4, PixelFormat::BGRA8);
        let buffer = reconstruct(&raw, PixelFormat::BGR8).unwrap();
        assert_eq!(buffer.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_padding_is_cropped() {
        let raw = bgra_frame(3, 8, 2);
        let buffer = reconstruct(&raw, PixelFormat::RGB8).unwrap();

        assert_eq!(buffer.dimensions(), (2, 3, 3));
        assert!(!buffer.data.contains(&0xEE));
        assert_eq!(buffer.get_pixel(2, 1).unwrap(), &[200, 1, 2]);
    }

    #[test]
    fn test_width_larger_than_row_rejected() {
        let mut raw = bgra_frame(4, 4, 2);
        raw.width = 5;
        assert!(matches!(
            reconstruct(&raw, PixelFormat::RGB8),
            Err(CaptureError::CaptureFailed(_))
        ));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let raw = RawFrame::new(Vec::new(), 0, 10, 0, PixelFormat::BGRA8);
        assert!(reconstruct(&raw, PixelFormat::RGB8).is_err());
    }

    #[test]
    fn test_alpha_output_rejected() {
        let raw = bgra_frame(1, 1, 1);
        assert!(matches!(
            reconstruct(&raw, PixelFormat::RGBA8),
            Err(CaptureError::InvalidConfiguration(_))
        ));
    }
}
