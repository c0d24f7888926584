//! Preview window backed by eframe/egui
//!
//! eframe owns the event loop, so each `update` runs exactly one
//! [`PreviewLoop::step`] and requests another repaint straight away.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions, Vec2};

use super::{LoopControl, PreviewConfig, PreviewLoop, PreviewStats, PreviewSurface};
use crate::{
    capture::WindowCapture,
    error::{CaptureError, CaptureResult},
    types::{CaptureBuffer, PixelFormat},
};

type Outcome = Rc<RefCell<Option<CaptureResult<PreviewStats>>>>;

/// Open a preview window and loop until the cancel key is pressed
///
/// Closing the window also ends the loop. A capture error closes the window
/// and is returned.
pub fn run_preview_window<C>(capture: C, config: PreviewConfig) -> CaptureResult<PreviewStats>
where
    C: WindowCapture + 'static,
{
    let title = config.title.clone();
    let preview = PreviewLoop::new(capture, config)?;
    let outcome: Outcome = Rc::new(RefCell::new(None));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    let app_outcome = Rc::clone(&outcome);
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(PreviewApp {
                preview,
                texture: None,
                outcome: app_outcome,
            }))
        }),
    )
    .map_err(|e| CaptureError::Other(anyhow::anyhow!("preview window failed: {}", e)))?;

    let result = outcome.borrow_mut().take();
    result.unwrap_or_else(|| Ok(PreviewStats::default()))
}

struct PreviewApp<C: WindowCapture> {
    preview: PreviewLoop<C>,
    texture: Option<TextureHandle>,
    outcome: Outcome,
}

impl<C: WindowCapture> eframe::App for PreviewApp<C> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let finished = matches!(*self.outcome.borrow(), Some(Err(_)));
        if !finished {
            let mut surface = EguiSurface {
                ctx,
                texture: &mut self.texture,
            };

            let step = self.preview.step(&mut surface);
            let stats = self.preview.stats().clone();
            match step {
                Ok(LoopControl::Continue) => {
                    *self.outcome.borrow_mut() = Some(Ok(stats));
                }
                Ok(LoopControl::Stop) => {
                    *self.outcome.borrow_mut() = Some(Ok(stats));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                Err(e) => {
                    log::error!("preview stopped: {}", e);
                    *self.outcome.borrow_mut() = Some(Err(e));
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }

        let fps = self.preview.stats().last_fps;
        egui::TopBottomPanel::top("fps").show(ctx, |ui| match fps {
            Some(fps) => ui.label(format!("FPS: {:.1}", fps)),
            None => ui.label("FPS: -"),
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(texture) = &self.texture {
                let available = ui.available_size();
                let size = texture.size_vec2();
                let scale = (available.x / size.x).min(available.y / size.y).min(1.0);
                ui.image((texture.id(), Vec2::new(size.x * scale, size.y * scale)));
            }
        });

        ctx.request_repaint();
    }
}

/// One-frame adapter between the preview loop and an egui context
struct EguiSurface<'a> {
    ctx: &'a egui::Context,
    texture: &'a mut Option<TextureHandle>,
}

impl PreviewSurface for EguiSurface<'_> {
    fn present(&mut self, frame: &CaptureBuffer) -> CaptureResult<()> {
        if !frame.is_valid() {
            return Err(CaptureError::CaptureFailed(format!(
                "{}x{} {:?} frame holds {} bytes",
                frame.width,
                frame.height,
                frame.format,
                frame.data.len()
            )));
        }

        let size = [frame.width as usize, frame.height as usize];
        let image = match frame.format {
            PixelFormat::RGB8 => ColorImage::from_rgb(size, &frame.data),
            _ => {
                let rgb = frame.to_rgb_image()?;
                ColorImage::from_rgb(size, rgb.as_raw())
            }
        };

        match self.texture.as_mut() {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                *self.texture =
                    Some(self.ctx.load_texture("preview", image, TextureOptions::LINEAR));
            }
        }
        Ok(())
    }

    // egui input is already a per-frame snapshot, so the timeout never blocks
    fn poll_key(&mut self, _timeout: Duration) -> Option<char> {
        self.ctx.input(|input| {
            input.events.iter().find_map(|event| match event {
                egui::Event::Key {
                    key, pressed: true, ..
                } => {
                    let mut chars = key.name().chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c.to_ascii_lowercase()),
                        _ => None,
                    }
                }
                _ => None,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mis_sized_frames_are_rejected() {
        let ctx = egui::Context::default();
        let mut texture = None;
        let mut surface = EguiSurface {
            ctx: &ctx,
            texture: &mut texture,
        };

        for format in [PixelFormat::RGB8, PixelFormat::BGR8] {
            let frame = CaptureBuffer::new(vec![0; 5], 2, 1, format);
            assert!(matches!(
                surface.present(&frame),
                Err(CaptureError::CaptureFailed(_))
            ));
        }
        assert!(texture.is_none());
    }
}
