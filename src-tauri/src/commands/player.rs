//! Reports from the embedded player views and page plumbing.

use crate::state::StageContext;
use remix_stage_core::bridge::{
    PlayerEventPayload, MAIN_VIEW_LABEL, PLAYER_EVENT, PLAYER_STATE_EVENT,
};
use serde_json::Value;
use tauri::{AppHandle, Emitter, EventTarget, Manager, State, Webview};
use tracing::{debug, warn};

fn require_player_view(webview: &Webview) -> Result<(), String> {
    if webview.label().starts_with("youtube-view") {
        Ok(())
    } else {
        Err(format!("Player reports not accepted from {}", webview.label()))
    }
}

/// Player state change, forwarded to the main view as `youtube-state-change`.
#[tauri::command]
pub fn youtube_player_state(app: AppHandle, webview: Webview, state: Value) -> Result<(), String> {
    require_player_view(&webview)?;
    app.emit_to(EventTarget::webview(MAIN_VIEW_LABEL), PLAYER_STATE_EVENT, state)
        .map_err(|e| e.to_string())
}

/// Named player event, forwarded to the main view as `youtube-event`.
#[tauri::command]
pub fn youtube_player_event(
    app: AppHandle,
    webview: Webview,
    event_type: String,
    data: Option<Value>,
) -> Result<(), String> {
    require_player_view(&webview)?;
    debug!(label = webview.label(), %event_type, "Player event");
    let payload = PlayerEventPayload {
        event_type,
        data: data.unwrap_or(Value::Null),
    };
    app.emit_to(EventTarget::webview(MAIN_VIEW_LABEL), PLAYER_EVENT, payload)
        .map_err(|e| e.to_string())
}

/// Completes a pending script evaluation.
#[tauri::command]
pub fn surface_script_result(state: State<'_, StageContext>, token: u64, value: Value) {
    if !state.scripts.complete(token, value) {
        warn!(token, "Dropped late or unknown script result");
    }
}

/// Open devtools for the main view (Ctrl+Shift+I).
#[tauri::command]
pub fn open_devtools(app: AppHandle) {
    if let Some(view) = app.get_webview(MAIN_VIEW_LABEL) {
        view.open_devtools();
    }
}
