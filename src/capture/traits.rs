//! Traits for window capture functionality

use crate::error::{CaptureError, CaptureResult};
use crate::types::{CaptureBuffer, WindowDescriptor};

/// Capability set every platform backend provides
pub trait WindowCapture {
    /// Snapshot of the window server's window list, front to back
    fn enumerate_windows(&self) -> CaptureResult<Vec<WindowDescriptor>>;

    /// Capture the primary display's on-screen contents
    fn capture_full_screen(&self) -> CaptureResult<CaptureBuffer>;

    /// Capture a single window regardless of occlusion
    fn capture_window(&self, window_id: u32) -> CaptureResult<CaptureBuffer>;

    /// Get the implementation name
    fn implementation_name(&self) -> String;

    /// First window whose title equals `name`, in enumeration order
    fn find_window_by_name(&self, name: &str) -> CaptureResult<Option<WindowDescriptor>> {
        Ok(self
            .enumerate_windows()?
            .into_iter()
            .find(|window| window.name == name))
    }

    fn find_window_by_id(&self, window_id: u32) -> CaptureResult<Option<WindowDescriptor>> {
        Ok(self
            .enumerate_windows()?
            .into_iter()
            .find(|window| window.id == window_id))
    }

    /// Titles of all windows, in enumeration order
    fn window_names(&self) -> CaptureResult<Vec<String>> {
        Ok(self
            .enumerate_windows()?
            .into_iter()
            .map(|window| window.name)
            .collect())
    }

    /// Look a window up by title and capture it
    fn capture_window_by_name(&self, name: &str) -> CaptureResult<CaptureBuffer> {
        let window = self
            .find_window_by_name(name)?
            .ok_or_else(|| CaptureError::WindowNotFound(name.to_string()))?;
        log::debug!("capturing window {} ({:?})", window.id, window.name);
        self.capture_window(window.id)
    }

    /// Get capabilities of the implementation
    fn capabilities(&self) -> CaptureCapabilities {
        CaptureCapabilities::default()
    }
}

impl<T: WindowCapture + ?Sized> WindowCapture for Box<T> {
    fn enumerate_windows(&self) -> CaptureResult<Vec<WindowDescriptor>> {
        (**self).enumerate_windows()
    }

    fn capture_full_screen(&self) -> CaptureResult<CaptureBuffer> {
        (**self).capture_full_screen()
    }

    fn capture_window(&self, window_id: u32) -> CaptureResult<CaptureBuffer> {
        (**self).capture_window(window_id)
    }

    fn implementation_name(&self) -> String {
        (**self).implementation_name()
    }

    fn find_window_by_name(&self, name: &str) -> CaptureResult<Option<WindowDescriptor>> {
        (**self).find_window_by_name(name)
    }

    fn find_window_by_id(&self, window_id: u32) -> CaptureResult<Option<WindowDescriptor>> {
        (**self).find_window_by_id(window_id)
    }

    fn window_names(&self) -> CaptureResult<Vec<String>> {
        (**self).window_names()
    }

    fn capture_window_by_name(&self, name: &str) -> CaptureResult<CaptureBuffer> {
        (**self).capture_window_by_name(name)
    }

    fn capabilities(&self) -> CaptureCapabilities {
        (**self).capabilities()
    }
}

/// Capabilities of a capture implementation
#[derive(Debug, Clone, Default)]
pub struct CaptureCapabilities {
    /// Can capture an individual window behind other windows
    pub supports_occluded_windows: bool,
    /// Enumeration includes off-screen and minimized windows
    pub lists_offscreen_windows: bool,
    /// Frames can be captured without window framing and shadow
    pub supports_frameless_capture: bool,
    /// Capture requires a user-granted permission
    pub requires_permission: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PixelFormat, Rectangle};

    struct StaticWindows(Vec<WindowDescriptor>);

    impl WindowCapture for StaticWindows {
        fn enumerate_windows(&self) -> CaptureResult<Vec<WindowDescriptor>> {
            Ok(self.0.clone())
        }

        fn capture_full_screen(&self) -> CaptureResult<CaptureBuffer> {
            Ok(CaptureBuffer::new(vec![0; 3], 1, 1, PixelFormat::RGB8))
        }

        fn capture_window(&self, window_id: u32) -> CaptureResult<CaptureBuffer> {
            Ok(CaptureBuffer::new(vec![window_id as u8; 3], 1, 1, PixelFormat::RGB8))
        }

        fn implementation_name(&self) -> String {
            "static".to_string()
        }
    }

    fn windows() -> StaticWindows {
        StaticWindows(vec![
            WindowDescriptor::new(1, "A", Rectangle::default()),
            WindowDescriptor::new(2, "B", Rectangle::default()),
            WindowDescriptor::new(3, "A", Rectangle::default()),
        ])
    }

    #[test]
    fn test_first_match_wins() {
        let found = windows().find_window_by_name("A").unwrap().unwrap();
        assert_eq!(found.id, 1);
    }

    #[test]
    fn test_missing_lookup_is_sentinel() {
        assert!(windows().find_window_by_name("C").unwrap().is_none());
        assert!(windows().find_window_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_capture_by_name_uses_lookup() {
        let buffer = windows().capture_window_by_name("B").unwrap();
        assert_eq!(buffer.data, vec![2, 2, 2]);

        let err = windows().capture_window_by_name("missing").unwrap_err();
        assert!(matches!(err, CaptureError::WindowNotFound(name) if name == "missing"));
    }

    /// Resolves titles case-insensitively instead of through the default lookup
    struct CaseInsensitive(StaticWindows);

    impl WindowCapture for CaseInsensitive {
        fn enumerate_windows(&self) -> CaptureResult<Vec<WindowDescriptor>> {
            self.0.enumerate_windows()
        }

        fn capture_full_screen(&self) -> CaptureResult<CaptureBuffer> {
            self.0.capture_full_screen()
        }

        fn capture_window(&self, window_id: u32) -> CaptureResult<CaptureBuffer> {
            self.0.capture_window(window_id)
        }

        fn implementation_name(&self) -> String {
            "case-insensitive".to_string()
        }

        fn window_names(&self) -> CaptureResult<Vec<String>> {
            Ok(vec!["overridden".to_string()])
        }

        fn capture_window_by_name(&self, name: &str) -> CaptureResult<CaptureBuffer> {
            let window = self
                .enumerate_windows()?
                .into_iter()
                .find(|window| window.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| CaptureError::WindowNotFound(name.to_string()))?;
            self.capture_window(window.id)
        }
    }

    #[test]
    fn test_boxed_backend_keeps_overrides() {
        let boxed: Box<dyn WindowCapture> = Box::new(CaseInsensitive(windows()));
        assert_eq!(boxed.window_names().unwrap(), vec!["overridden"]);
        assert_eq!(boxed.capture_window_by_name("b").unwrap().data, vec![2, 2, 2]);
    }

    #[test]
    fn test_boxed_backend_delegates() {
        let boxed: Box<dyn WindowCapture> = Box::new(windows());
        assert_eq!(boxed.window_names().unwrap(), vec!["A", "B", "A"]);
        assert_eq!(boxed.implementation_name(), "static");
    }
}
