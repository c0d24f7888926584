//! Live capture-and-display loop
//!
//! Single-threaded: every iteration captures a frame, hands it to a
//! [`PreviewSurface`], records the instantaneous frame rate and polls the
//! surface for the cancel key. There is no frame-rate limit and no retry; a
//! capture error ends the loop and is returned to the caller.

#[cfg(feature = "preview")]
pub mod egui_surface;

use crate::{
    capture::WindowCapture,
    error::{CaptureError, CaptureResult},
    types::CaptureBuffer,
};

use std::time::{Duration, Instant};

/// A place frames can be shown, with a non-blocking keypress poll
pub trait PreviewSurface {
    /// Display a frame
    fn present(&mut self, frame: &CaptureBuffer) -> CaptureResult<()>;

    /// Return a key pressed since the last poll, waiting at most `timeout`
    fn poll_key(&mut self, timeout: Duration) -> Option<char>;

    /// Tear the surface down
    fn close(&mut self) {}
}

/// What the preview loop captures each iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewTarget {
    FullScreen,
    /// Looked up by title on every iteration
    WindowName(String),
    WindowId(u32),
}

/// Preview loop configuration
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub target: PreviewTarget,
    /// Key that ends the loop
    pub cancel_key: char,
    /// Upper bound on each keypress poll
    pub poll_timeout: Duration,
    /// Title of the preview surface
    pub title: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            target: PreviewTarget::FullScreen,
            cancel_key: 'q',
            poll_timeout: Duration::from_millis(1),
            title: "Screen Capture".to_string(),
        }
    }
}

impl PreviewConfig {
    pub fn for_target(target: PreviewTarget) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CaptureResult<()> {
        if self.cancel_key.is_control() {
            return Err(CaptureError::InvalidConfiguration(format!(
                "cancel key must be printable, got {:?}",
                self.cancel_key
            )));
        }
        if let PreviewTarget::WindowName(name) = &self.target {
            if name.is_empty() {
                return Err(CaptureError::InvalidConfiguration(
                    "preview window name is empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Instantaneous frame rate from consecutive ticks
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    last: Instant,
}

impl FrameRateMeter {
    pub fn new(start: Instant) -> Self {
        Self { last: start }
    }

    /// Record a tick and return `1 / elapsed` since the previous one
    ///
    /// Returns `None` when no measurable time has passed.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        let seconds = elapsed.as_secs_f64();
        if seconds > 0.0 {
            Some(1.0 / seconds)
        } else {
            None
        }
    }
}

/// Whether the loop keeps going after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Preview statistics
#[derive(Debug, Clone, Default)]
pub struct PreviewStats {
    pub frames: u64,
    pub last_fps: Option<f64>,
    pub elapsed: Duration,
}

impl PreviewStats {
    /// Mean frame rate over the whole run
    pub fn average_fps(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.frames as f64 / seconds
        } else {
            0.0
        }
    }
}

/// Capture-and-display loop over any backend
pub struct PreviewLoop<C: WindowCapture> {
    capture: C,
    config: PreviewConfig,
    meter: FrameRateMeter,
    started: Instant,
    stats: PreviewStats,
}

impl<C: WindowCapture> PreviewLoop<C> {
    pub fn new(capture: C, config: PreviewConfig) -> CaptureResult<Self> {
        config.validate()?;
        let started = Instant::now();
        Ok(Self {
            capture,
            config,
            meter: FrameRateMeter::new(started),
            started,
            stats: PreviewStats::default(),
        })
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn stats(&self) -> &PreviewStats {
        &self.stats
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    fn grab(&self) -> CaptureResult<CaptureBuffer> {
        match &self.config.target {
            PreviewTarget::FullScreen => self.capture.capture_full_screen(),
            PreviewTarget::WindowName(name) => self.capture.capture_window_by_name(name),
            PreviewTarget::WindowId(id) => self.capture.capture_window(*id),
        }
    }

    /// Run one iteration: capture, present, measure, poll
    pub fn step(&mut self, surface: &mut dyn PreviewSurface) -> CaptureResult<LoopControl> {
        let frame = self.grab()?;
        surface.present(&frame)?;

        let now = Instant::now();
        self.stats.frames += 1;
        self.stats.elapsed = now.duration_since(self.started);
        if let Some(fps) = self.meter.tick(now) {
            log::info!("FPS: {:.1}", fps);
            self.stats.last_fps = Some(fps);
        }

        match surface.poll_key(self.config.poll_timeout) {
            Some(key) if key == self.config.cancel_key => {
                log::debug!("cancel key {:?} pressed after {} frames", key, self.stats.frames);
                Ok(LoopControl::Stop)
            }
            _ => Ok(LoopControl::Continue),
        }
    }

    /// Loop until the cancel key is pressed or a step fails
    pub fn run(mut self, surface: &mut dyn PreviewSurface) -> CaptureResult<PreviewStats> {
        let result = loop {
            match self.step(surface) {
                Ok(LoopControl::Continue) => continue,
                Ok(LoopControl::Stop) => break Ok(self.stats.clone()),
                Err(e) => break Err(e),
            }
        };
        surface.close();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_rate_meter() {
        let start = Instant::now();
        let mut meter = FrameRateMeter::new(start);

        let fps = meter.tick(start + Duration::from_millis(20)).unwrap();
        assert_relative_eq!(fps, 50.0, epsilon = 1e-9);

        let fps = meter.tick(start + Duration::from_millis(120)).unwrap();
        assert_relative_eq!(fps, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frame_rate_meter_zero_interval() {
        let start = Instant::now();
        let mut meter = FrameRateMeter::new(start);
        assert!(meter.tick(start).is_none());
    }

    #[test]
    fn test_average_fps() {
        let stats = PreviewStats {
            frames: 30,
            last_fps: None,
            elapsed: Duration::from_secs(2),
        };
        assert_relative_eq!(stats.average_fps(), 15.0);
        assert_eq!(PreviewStats::default().average_fps(), 0.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(PreviewConfig::default().validate().is_ok());

        let config = PreviewConfig {
            cancel_key: '\n',
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PreviewConfig::for_target(PreviewTarget::WindowName(String::new()));
        assert!(config.validate().is_err());
    }
}
