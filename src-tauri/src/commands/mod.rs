//! Tauri command handlers organized by functionality.
//!
//! These are the only operations the UI can reach. Layer-scoped commands
//! take an optional `layerId`; an absent or unknown id is never an error.

mod capture;
mod playback;
mod player;

pub use capture::*;
pub use playback::*;
pub use player::*;

use remix_stage_core::bridge::MAIN_VIEW_LABEL;
use tauri::Webview;

/// Reject calls that do not come from the main UI view.
fn require_main_view(webview: &Webview) -> Result<(), String> {
    if webview.label() == MAIN_VIEW_LABEL {
        Ok(())
    } else {
        Err(format!("Command not available to {}", webview.label()))
    }
}
