//! Playback and search commands.

use super::require_main_view;
use crate::state::StageContext;
use remix_stage_core::LayerRef;
use serde_json::Value;
use tauri::{State, Webview};

/// Load a video on a layer, leaving it paused.
#[tauri::command]
pub async fn youtube_load_video(
    webview: Webview,
    state: State<'_, StageContext>,
    video_id: String,
    layer_id: Option<String>,
) -> Result<(), String> {
    require_main_view(&webview)?;
    let layer = LayerRef::from_request(layer_id.as_deref());
    state
        .dispatcher
        .load_video(&layer, &video_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn youtube_play(
    webview: Webview,
    state: State<'_, StageContext>,
    layer_id: Option<String>,
) -> Result<(), String> {
    require_main_view(&webview)?;
    let layer = LayerRef::from_request(layer_id.as_deref());
    state.dispatcher.play(&layer).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn youtube_pause(
    webview: Webview,
    state: State<'_, StageContext>,
    layer_id: Option<String>,
) -> Result<(), String> {
    require_main_view(&webview)?;
    let layer = LayerRef::from_request(layer_id.as_deref());
    state.dispatcher.pause(&layer).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn youtube_set_volume(
    webview: Webview,
    state: State<'_, StageContext>,
    volume: f64,
    layer_id: Option<String>,
) -> Result<(), String> {
    require_main_view(&webview)?;
    let layer = LayerRef::from_request(layer_id.as_deref());
    state
        .dispatcher
        .set_volume(&layer, volume)
        .await
        .map_err(|e| e.to_string())
}

/// Current position in seconds; 0 when the layer has no player.
#[tauri::command]
pub async fn youtube_get_current_time(
    webview: Webview,
    state: State<'_, StageContext>,
    layer_id: Option<String>,
) -> Result<f64, String> {
    require_main_view(&webview)?;
    let layer = LayerRef::from_request(layer_id.as_deref());
    state
        .dispatcher
        .get_current_time(&layer)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn youtube_seek_to(
    webview: Webview,
    state: State<'_, StageContext>,
    seconds: f64,
    layer_id: Option<String>,
) -> Result<(), String> {
    require_main_view(&webview)?;
    let layer = LayerRef::from_request(layer_id.as_deref());
    state
        .dispatcher
        .seek_to(&layer, seconds)
        .await
        .map_err(|e| e.to_string())
}

/// YouTube Data API search. Errors are the bare codes (`API_KEY_MISSING`, ...).
#[tauri::command]
pub async fn youtube_search(
    webview: Webview,
    state: State<'_, StageContext>,
    query: Option<String>,
    api_key: Option<String>,
) -> Result<Value, String> {
    require_main_view(&webview)?;
    state
        .search
        .search(
            query.as_deref().unwrap_or_default(),
            api_key.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(|e| e.to_string())
}
