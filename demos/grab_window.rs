//! Capture a window by title (or the whole display) to a PNG
//!
//! Usage: grab_window [WINDOW_TITLE] [OUTPUT.png]

use std::time::Instant;
use window_capture::{CaptureError, WindowCaptureService};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let title = args.next();
    let output = args.next().unwrap_or_else(|| "capture.png".to_string());

    let mut service = WindowCaptureService::new()?;

    let start = Instant::now();
    let frame = match title.as_deref() {
        Some(title) => match service.capture_window_by_name(title) {
            Ok(frame) => frame,
            Err(CaptureError::WindowNotFound(name)) => {
                eprintln!("No window titled {:?}. Available titles:", name);
                for name in service.window_names()?.iter().filter(|n| !n.is_empty()) {
                    eprintln!("  {:?}", name);
                }
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
        None => service.capture_full_screen()?,
    };
    println!("Captured {}x{} in {:?}", frame.width, frame.height, start.elapsed());

    frame.save(&output)?;
    println!("Saved to: {}", output);

    Ok(())
}
