//! Frame capture for layers and the application window.
//!
//! Every capture goes through the screen-recording permission gate first.
//! On platforms without one the gate is [`Ungated`].

pub mod encode;
pub mod source;

pub use source::{
    select_app_source, AppWindowCapture, CaptureSource, DesktopSource, SourceEnumerator,
    SourceKind,
};

use crate::layer::{Bounds, LayerRef};
use crate::registry::LayerRegistry;
use crate::surface::{CapturedFrame, Surface};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during capture.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Surface not found for layer: {0}")]
    SurfaceNotFound(String),
    #[error("Failed to capture {target}: {reason}")]
    CaptureFailed { target: String, reason: String },
    #[error("Screen recording permission required. Please grant permission in System Settings.")]
    PermissionRequired,
    #[error("No capture sources available. Check permissions.")]
    NoSourcesAvailable,
}

/// Screen-recording permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    /// Not granted yet; the OS may still prompt.
    NotGranted,
    /// The platform does not gate screen capture.
    NotRequired,
}

impl PermissionStatus {
    pub fn allows_capture(self) -> bool {
        matches!(self, Self::Granted | Self::NotRequired)
    }
}

/// OS screen-recording permission gate.
pub trait ScreenAccess: Send + Sync {
    fn status(&self) -> PermissionStatus;

    /// Ask the OS to prompt the user. Must not block waiting for an answer.
    fn request(&self);
}

/// Gate for platforms that never require permission.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ungated;

impl ScreenAccess for Ungated {
    fn status(&self) -> PermissionStatus {
        PermissionStatus::NotRequired
    }

    fn request(&self) {}
}

/// A captured layer frame, as handed to the stage compositor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerCapture {
    pub layer_id: String,
    /// PNG data URL
    pub image: String,
    pub bounds: Bounds,
}

pub struct FrameCaptureService {
    registry: Arc<LayerRegistry>,
    access: Arc<dyn ScreenAccess>,
    sources: Arc<dyn SourceEnumerator>,
    app_markers: Vec<String>,
}

impl FrameCaptureService {
    pub fn new(
        registry: Arc<LayerRegistry>,
        access: Arc<dyn ScreenAccess>,
        sources: Arc<dyn SourceEnumerator>,
        app_markers: Vec<String>,
    ) -> Self {
        Self {
            registry,
            access,
            sources,
            app_markers,
        }
    }

    /// Snapshot the dedicated capture window of a layer.
    pub async fn capture_layer(&self, layer: &LayerRef) -> Result<LayerCapture, CaptureError> {
        self.ensure_permission()?;
        let surface = self
            .registry
            .resolve_surface(layer)
            .ok_or_else(|| CaptureError::SurfaceNotFound(layer.to_string()))?;
        self.capture_surface(layer, surface).await
    }

    /// Snapshot the embedded player view routed for a layer.
    pub async fn capture_view(&self, layer: &LayerRef) -> Result<LayerCapture, CaptureError> {
        self.ensure_permission()?;
        let surface = self
            .registry
            .resolve_view(layer)
            .ok_or_else(|| CaptureError::SurfaceNotFound(layer.to_string()))?;
        self.capture_surface(layer, surface).await
    }

    /// Locate the application's own window among the desktop sources.
    pub async fn capture_app_window(&self) -> Result<AppWindowCapture, CaptureError> {
        self.ensure_permission()?;

        let sources = self.sources.sources().await.map_err(|e| CaptureError::CaptureFailed {
            target: "desktop sources".to_string(),
            reason: e.to_string(),
        })?;
        debug!(count = sources.len(), "Enumerated capture sources");

        let picked = select_app_source(&sources, &self.app_markers)
            .ok_or(CaptureError::NoSourcesAvailable)?
            .clone();
        info!(id = %picked.id, name = %picked.name, "Selected capture source");

        let (max_w, max_h) = encode::APP_THUMBNAIL_MAX;
        let thumbnail = match picked.thumbnail {
            Some(frame) => encode_off_thread(frame, Some((max_w, max_h)))
                .await
                .map_err(|reason| CaptureError::CaptureFailed {
                    target: picked.name.clone(),
                    reason,
                })?,
            None => String::new(),
        };

        Ok(AppWindowCapture {
            id: picked.id,
            name: picked.name,
            thumbnail,
        })
    }

    /// Every window and screen source with a small thumbnail.
    pub async fn desktop_sources(&self) -> Result<Vec<DesktopSource>, CaptureError> {
        let sources = self.sources.sources().await.map_err(|e| CaptureError::CaptureFailed {
            target: "desktop sources".to_string(),
            reason: e.to_string(),
        })?;

        let (max_w, max_h) = encode::SOURCE_THUMBNAIL_MAX;
        let mut listed = Vec::with_capacity(sources.len());
        for source in sources {
            let thumbnail = match source.thumbnail {
                Some(frame) => match encode_off_thread(frame, Some((max_w, max_h))).await {
                    Ok(url) => url,
                    Err(e) => {
                        warn!(id = %source.id, "Thumbnail encode failed: {}", e);
                        String::new()
                    }
                },
                None => String::new(),
            };
            listed.push(DesktopSource {
                id: source.id,
                name: source.name,
                kind: source.kind,
                thumbnail,
            });
        }
        Ok(listed)
    }

    pub fn permission_status(&self) -> PermissionStatus {
        self.access.status()
    }

    fn ensure_permission(&self) -> Result<(), CaptureError> {
        let status = self.access.status();
        if status.allows_capture() {
            return Ok(());
        }
        info!(?status, "Requesting screen recording permission");
        self.access.request();
        Err(CaptureError::PermissionRequired)
    }

    async fn capture_surface(
        &self,
        layer: &LayerRef,
        surface: Arc<dyn Surface>,
    ) -> Result<LayerCapture, CaptureError> {
        let failed = |reason: String| CaptureError::CaptureFailed {
            target: layer.to_string(),
            reason,
        };

        debug!(%layer, label = surface.label(), kind = ?surface.kind(), "Capturing surface");
        let frame = surface.capture().await.map_err(|e| failed(e.to_string()))?;
        if frame.is_empty() {
            return Err(failed("snapshot was empty".to_string()));
        }
        let image = encode_off_thread(frame, None).await.map_err(&failed)?;
        let bounds = surface.bounds().await.map_err(|e| failed(e.to_string()))?;

        Ok(LayerCapture {
            layer_id: layer.to_string(),
            image,
            bounds,
        })
    }
}

async fn encode_off_thread(
    frame: CapturedFrame,
    fit: Option<(u32, u32)>,
) -> Result<String, String> {
    tokio::task::spawn_blocking(move || match fit {
        Some((w, h)) => encode::thumbnail_data_url(&frame, w, h),
        None => encode::png_data_url(&frame),
    })
    .await
    .map_err(|e| format!("Encoder task failed: {}", e))?
}
