//! Layer-scoped playback commands.
//!
//! Every command resolves its surfaces through the [`LayerRegistry`]. A layer
//! with no surface is a silent no-op; only a surface that exists and then
//! fails produces an error.

use crate::layer::LayerRef;
use crate::registry::LayerRegistry;
use crate::surface::{Surface, SurfaceError};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::form_urlencoded;

/// Delay between starting a video and pausing it again.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch";

/// Pauses the page's own `<video>` element on a watch page.
const PAUSE_PAGE_VIDEO: &str =
    "(() => { const v = document.querySelector('video'); if (v && !v.paused) { v.pause(); } })();";

const CURRENT_TIME_EXPR: &str =
    "window.player && window.player.getCurrentTime ? window.player.getCurrentTime() : 0";

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{label}: {source}")]
    Surface {
        label: String,
        #[source]
        source: SurfaceError,
    },
}

impl DispatchError {
    fn on(surface: &dyn Surface) -> impl FnOnce(SurfaceError) -> Self + '_ {
        move |source| Self::Surface {
            label: surface.label().to_string(),
            source,
        }
    }
}

pub struct PlaybackDispatcher {
    registry: Arc<LayerRegistry>,
    settle_delay: Duration,
}

impl PlaybackDispatcher {
    pub fn new(registry: Arc<LayerRegistry>) -> Self {
        Self {
            registry,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Load a video on the layer's capture window and player view, leaving
    /// both paused.
    pub async fn load_video(&self, layer: &LayerRef, video_id: &str) -> Result<(), DispatchError> {
        info!(%layer, video_id, "Loading video");

        if let Some(window) = self.registry.resolve_surface(layer) {
            let url = watch_url(video_id);
            debug!(label = window.label(), %url, "Navigating capture window");
            window
                .load_url(&url)
                .await
                .map_err(DispatchError::on(window.as_ref()))?;
            window.reveal().await.map_err(DispatchError::on(window.as_ref()))?;
            tokio::time::sleep(self.settle_delay).await;
            window
                .execute(PAUSE_PAGE_VIDEO)
                .await
                .map_err(DispatchError::on(window.as_ref()))?;
        }

        if let Some(view) = self.registry.resolve_view(layer) {
            view.execute(&player_call("loadVideoById", &Value::from(video_id)))
                .await
                .map_err(DispatchError::on(view.as_ref()))?;
            tokio::time::sleep(self.settle_delay).await;
            view.execute(&player_call_no_args("pauseVideo"))
                .await
                .map_err(DispatchError::on(view.as_ref()))?;
        }

        Ok(())
    }

    pub async fn play(&self, layer: &LayerRef) -> Result<(), DispatchError> {
        self.on_view(layer, &player_call_no_args("playVideo")).await
    }

    pub async fn pause(&self, layer: &LayerRef) -> Result<(), DispatchError> {
        self.on_view(layer, &player_call_no_args("pauseVideo")).await
    }

    /// Volume is passed through as given; the player clamps it.
    pub async fn set_volume(&self, layer: &LayerRef, volume: f64) -> Result<(), DispatchError> {
        self.on_view(layer, &player_call("setVolume", &number(volume)))
            .await
    }

    pub async fn seek_to(&self, layer: &LayerRef, seconds: f64) -> Result<(), DispatchError> {
        self.on_view(layer, &player_call("seekTo", &number(seconds)))
            .await
    }

    /// Current playback position in seconds, 0 when nothing answers.
    pub async fn get_current_time(&self, layer: &LayerRef) -> Result<f64, DispatchError> {
        let Some(view) = self.registry.resolve_view(layer) else {
            return Ok(0.0);
        };
        let value = view
            .evaluate(CURRENT_TIME_EXPR)
            .await
            .map_err(DispatchError::on(view.as_ref()))?;
        match value.as_f64() {
            Some(seconds) => Ok(seconds),
            None => {
                warn!(label = view.label(), ?value, "Non-numeric player time");
                Ok(0.0)
            }
        }
    }

    async fn on_view(&self, layer: &LayerRef, script: &str) -> Result<(), DispatchError> {
        match self.registry.resolve_view(layer) {
            Some(view) => view
                .execute(script)
                .await
                .map_err(DispatchError::on(view.as_ref())),
            None => Ok(()),
        }
    }
}

/// Watch page URL for a video, with the id query-encoded.
pub fn watch_url(video_id: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("v", video_id)
        .append_pair("autoplay", "1")
        .append_pair("controls", "1")
        .append_pair("rel", "0")
        .append_pair("modestbranding", "1")
        .finish();
    format!("{YOUTUBE_WATCH_URL}?{query}")
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn player_call(method: &str, arg: &Value) -> String {
    format!("if (window.player && window.player.{method}) {{ window.player.{method}({arg}); }}")
}

fn player_call_no_args(method: &str) -> String {
    format!("if (window.player && window.player.{method}) {{ window.player.{method}(); }}")
}
