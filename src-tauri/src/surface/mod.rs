//! Tauri-backed implementations of the core `Surface` trait.

pub mod navigation;
pub mod permission;
pub mod script;
#[cfg(desktop)]
pub mod snapshot;
mod view;
mod window;

pub use navigation::PageLoads;
pub use script::ScriptResults;
pub use view::ViewSurface;
pub use window::WindowSurface;

use remix_stage_core::{Bounds, SurfaceError};
use tauri::{PhysicalPosition, PhysicalSize};

fn platform(err: tauri::Error) -> SurfaceError {
    SurfaceError::Platform(err.to_string())
}

fn parse_url(url: &str) -> Result<tauri::Url, SurfaceError> {
    url.parse::<tauri::Url>()
        .map_err(|e| SurfaceError::Navigation(format!("{}: {}", url, e)))
}

fn to_bounds(position: PhysicalPosition<i32>, size: PhysicalSize<u32>) -> Bounds {
    Bounds::new(position.x, position.y, size.width, size.height)
}
