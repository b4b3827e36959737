//! Event names and payloads pushed from the shell to the UI.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OAuth callback URL, forwarded verbatim.
pub const OAUTH_CALLBACK_EVENT: &str = "oauth-callback";

/// Player state report from the embedded player view.
pub const PLAYER_STATE_EVENT: &str = "youtube-state-change";

/// Named player event (ready, error, ...) from the embedded player view.
pub const PLAYER_EVENT: &str = "youtube-event";

/// Label of the main UI view that receives every event.
pub const MAIN_VIEW_LABEL: &str = "main-view";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEventPayload {
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}
