use super::{parse_url, platform, to_bounds, PageLoads, ScriptResults};
use async_trait::async_trait;
use remix_stage_core::{Bounds, CapturedFrame, Surface, SurfaceError, SurfaceKind};
use serde_json::Value;
use std::sync::Arc;
use tauri::{PhysicalPosition, PhysicalSize, WebviewWindow};
use tracing::debug;

/// Frameless top-level window kept off-screen for capture.
pub struct WindowSurface {
    window: WebviewWindow,
    scripts: Arc<ScriptResults>,
    page_loads: Arc<PageLoads>,
}

impl WindowSurface {
    pub fn new(
        window: WebviewWindow,
        scripts: Arc<ScriptResults>,
        page_loads: Arc<PageLoads>,
    ) -> Self {
        Self {
            window,
            scripts,
            page_loads,
        }
    }
}

#[async_trait]
impl Surface for WindowSurface {
    fn label(&self) -> &str {
        self.window.label()
    }

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::DedicatedWindow
    }

    async fn load_url(&self, url: &str) -> Result<(), SurfaceError> {
        let url = parse_url(url)?;
        self.page_loads
            .navigate(self.window.label(), || {
                self.window.navigate(url).map_err(platform)
            })
            .await
    }

    async fn execute(&self, script: &str) -> Result<(), SurfaceError> {
        self.window
            .eval(script)
            .map_err(|e| SurfaceError::Script(e.to_string()))
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, SurfaceError> {
        self.scripts
            .evaluate(expression, |script| {
                self.window
                    .eval(script)
                    .map_err(|e| SurfaceError::Script(e.to_string()))
            })
            .await
    }

    async fn bounds(&self) -> Result<Bounds, SurfaceError> {
        let position = self.window.outer_position().map_err(platform)?;
        let size = self.window.outer_size().map_err(platform)?;
        Ok(to_bounds(position, size))
    }

    async fn set_bounds(&self, bounds: Bounds) -> Result<(), SurfaceError> {
        self.window
            .set_position(PhysicalPosition::new(bounds.x, bounds.y))
            .map_err(platform)?;
        self.window
            .set_size(PhysicalSize::new(bounds.width, bounds.height))
            .map_err(platform)
    }

    async fn reveal(&self) -> Result<(), SurfaceError> {
        if !self.window.is_visible().map_err(platform)? {
            debug!(label = self.window.label(), "Showing capture window off-screen");
            self.window.show().map_err(platform)?;
        }
        Ok(())
    }

    async fn capture(&self) -> Result<CapturedFrame, SurfaceError> {
        #[cfg(desktop)]
        {
            let title = self.window.title().map_err(platform)?;
            super::snapshot::capture_window_titled_async(title).await
        }

        #[cfg(mobile)]
        {
            Err(SurfaceError::Snapshot("not supported on this platform".to_string()))
        }
    }
}
