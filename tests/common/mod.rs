//! Scripted backend and surface shared by the integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use window_capture::capture::reconstruct::reconstruct;
use window_capture::*;

/// In-memory window server: a fixed window list and a frame generator
pub struct ScriptedBackend {
    pub windows: RefCell<Vec<WindowDescriptor>>,
    pub width: u32,
    pub row_width: u32,
    pub height: u32,
    pub output: PixelFormat,
    pub fail_after: Option<usize>,
    pub captures: Cell<usize>,
}

impl ScriptedBackend {
    pub fn new(windows: Vec<WindowDescriptor>) -> Self {
        Self {
            windows: RefCell::new(windows),
            width: 4,
            row_width: 4,
            height: 3,
            output: PixelFormat::RGB8,
            fail_after: None,
            captures: Cell::new(0),
        }
    }

    pub fn named(names: &[(u32, &str)]) -> Self {
        Self::new(
            names
                .iter()
                .map(|(id, name)| WindowDescriptor::new(*id, *name, Rectangle::new(0, 0, 800, 600)))
                .collect(),
        )
    }

    /// Frame whose blue channel carries `tag`, padded to `row_width`
    pub fn raw_frame(&self, tag: u8) -> RawFrame {
        let mut data = Vec::new();
        for y in 0..self.height {
            for x in 0..self.row_width {
                if x < self.width {
                    data.extend_from_slice(&[tag, x as u8, y as u8, 255]);
                } else {
                    data.extend_from_slice(&[0xAB; 4]);
                }
            }
        }
        RawFrame::new(
            data,
            self.width,
            self.height,
            (self.row_width * 4) as usize,
            PixelFormat::BGRA8,
        )
    }

    fn produce(&self, tag: u8) -> CaptureResult<CaptureBuffer> {
        let count = self.captures.get();
        self.captures.set(count + 1);
        if let Some(limit) = self.fail_after {
            if count >= limit {
                return Err(CaptureError::CaptureFailed("no image".to_string()));
            }
        }
        reconstruct(&self.raw_frame(tag), self.output)
    }
}

impl WindowCapture for ScriptedBackend {
    fn enumerate_windows(&self) -> CaptureResult<Vec<WindowDescriptor>> {
        Ok(self.windows.borrow().clone())
    }

    fn capture_full_screen(&self) -> CaptureResult<CaptureBuffer> {
        self.produce(0)
    }

    fn capture_window(&self, window_id: u32) -> CaptureResult<CaptureBuffer> {
        if !self.windows.borrow().iter().any(|w| w.id == window_id) {
            return Err(CaptureError::CaptureFailed(format!("no window {}", window_id)));
        }
        self.produce(window_id as u8)
    }

    fn implementation_name(&self) -> String {
        "scripted".to_string()
    }
}

/// Surface that records frames and replays a key script
#[derive(Default)]
pub struct ScriptedSurface {
    pub frames: Vec<CaptureBuffer>,
    pub keys: VecDeque<Option<char>>,
    pub polls: Vec<Duration>,
    pub closed: bool,
}

impl ScriptedSurface {
    pub fn with_keys(keys: &[Option<char>]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl PreviewSurface for ScriptedSurface {
    fn present(&mut self, frame: &CaptureBuffer) -> CaptureResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<char> {
        self.polls.push(timeout);
        self.keys.pop_front().flatten()
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
