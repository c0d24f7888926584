//! Live preview of the display or of one window; press `q` to quit
//!
//! Usage: live_preview [WINDOW_TITLE]

use window_capture::{PreviewConfig, PreviewTarget, WindowCaptureService};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // FPS is reported at info level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let target = match std::env::args().nth(1) {
        Some(title) => PreviewTarget::WindowName(title),
        None => PreviewTarget::FullScreen,
    };

    let service = WindowCaptureService::new()?;
    let stats = service.run_preview_window(PreviewConfig::for_target(target))?;

    println!(
        "Previewed {} frames, average {:.1} FPS",
        stats.frames,
        stats.average_fps()
    );

    Ok(())
}
