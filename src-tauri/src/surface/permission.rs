//! Screen-recording permission gate.
//!
//! Only macOS gates screen capture (TCC). Elsewhere captures are ungated.

use remix_stage_core::capture::ScreenAccess;
#[cfg(target_os = "macos")]
use remix_stage_core::capture::PermissionStatus;
use std::sync::Arc;
use tauri::AppHandle;

#[cfg(target_os = "macos")]
const SCREEN_CAPTURE_SETTINGS_URL: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_ScreenCapture";

/// Permission gate for the current platform.
pub fn platform_access() -> Arc<dyn ScreenAccess> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(MacScreenAccess)
    }

    #[cfg(not(target_os = "macos"))]
    {
        Arc::new(remix_stage_core::capture::Ungated)
    }
}

/// Open the OS screen-recording settings, prompting first so the app is
/// listed there. Does nothing on platforms without the permission.
pub fn open_settings(app: &AppHandle) {
    #[cfg(target_os = "macos")]
    {
        use tauri_plugin_opener::OpenerExt;
        MacScreenAccess.request();
        if let Err(e) = app.opener().open_url(SCREEN_CAPTURE_SETTINGS_URL, None::<&str>) {
            tracing::warn!("Failed to open screen recording settings: {}", e);
        }
    }

    #[cfg(not(target_os = "macos"))]
    let _ = app;
}

#[cfg(target_os = "macos")]
pub struct MacScreenAccess;

#[cfg(target_os = "macos")]
impl ScreenAccess for MacScreenAccess {
    fn status(&self) -> PermissionStatus {
        if unsafe { CGPreflightScreenCaptureAccess() } {
            PermissionStatus::Granted
        } else {
            PermissionStatus::NotGranted
        }
    }

    fn request(&self) {
        // Returns immediately; the prompt is shown asynchronously
        unsafe { CGRequestScreenCaptureAccess() };
    }
}

#[cfg(target_os = "macos")]
#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGPreflightScreenCaptureAccess() -> bool;
    fn CGRequestScreenCaptureAccess() -> bool;
}
