//! List every window the window server reports

use window_capture::WindowCaptureService;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let service = WindowCaptureService::new()?;
    println!("Backend: {}\n", service.implementation_name());

    let windows = service.enumerate_windows()?;
    println!("Found {} window(s):", windows.len());
    for window in &windows {
        println!(
            "  {:>6}  {:<24} {:<40} {}x{} at ({}, {}){}",
            window.id,
            window.owner_name,
            format!("{:?}", window.name),
            window.bounds.width,
            window.bounds.height,
            window.bounds.x,
            window.bounds.y,
            if window.is_on_screen { "" } else { "  [off-screen]" }
        );
    }

    Ok(())
}
