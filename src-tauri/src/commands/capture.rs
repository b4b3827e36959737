//! Frame capture commands.

use super::require_main_view;
use crate::state::StageContext;
use crate::surface::permission;
use remix_stage_core::capture::{AppWindowCapture, DesktopSource, PermissionStatus};
use remix_stage_core::{LayerCapture, LayerRef};
use tauri::{AppHandle, State, Webview};
use tracing::{error, info};

/// Snapshot a layer's dedicated capture window.
#[tauri::command]
pub async fn capture_youtube_window(
    webview: Webview,
    state: State<'_, StageContext>,
    layer_id: Option<String>,
) -> Result<LayerCapture, String> {
    require_main_view(&webview)?;
    let layer = LayerRef::from_request(layer_id.as_deref());
    state.capture.capture_layer(&layer).await.map_err(|e| {
        error!(%layer, "Window capture failed: {}", e);
        e.to_string()
    })
}

/// Snapshot the embedded player view serving a layer.
#[tauri::command]
pub async fn capture_youtube_view(
    webview: Webview,
    state: State<'_, StageContext>,
    layer_id: Option<String>,
) -> Result<LayerCapture, String> {
    require_main_view(&webview)?;
    let layer = LayerRef::from_request(layer_id.as_deref());
    state.capture.capture_view(&layer).await.map_err(|e| {
        error!(%layer, "View capture failed: {}", e);
        e.to_string()
    })
}

/// Locate the application window among desktop capture sources.
#[tauri::command]
pub async fn capture_view(
    webview: Webview,
    state: State<'_, StageContext>,
    view_type: Option<String>,
) -> Result<AppWindowCapture, String> {
    require_main_view(&webview)?;
    info!(view_type = view_type.as_deref().unwrap_or("app"), "Capturing app window");
    state.capture.capture_app_window().await.map_err(|e| {
        error!("App window capture failed: {}", e);
        format!("Failed to get sources: {}", e)
    })
}

/// All window and screen sources with small thumbnails.
#[tauri::command]
pub async fn get_desktop_sources(
    webview: Webview,
    state: State<'_, StageContext>,
) -> Result<Vec<DesktopSource>, String> {
    require_main_view(&webview)?;
    state
        .capture
        .desktop_sources()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn check_screen_recording_permission(state: State<'_, StageContext>) -> PermissionStatus {
    state.capture.permission_status()
}

/// Open system settings to the Screen Recording pane (macOS only).
#[tauri::command]
pub fn open_screen_recording_settings(app: AppHandle) {
    permission::open_settings(&app);
}
