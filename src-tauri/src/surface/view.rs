use super::{parse_url, platform, to_bounds, PageLoads, ScriptResults};
use async_trait::async_trait;
use remix_stage_core::{Bounds, CapturedFrame, Surface, SurfaceError, SurfaceKind};
use serde_json::Value;
use std::sync::Arc;
use tauri::{PhysicalPosition, PhysicalSize, Webview};

/// Child webview embedded in the main window.
pub struct ViewSurface {
    webview: Webview,
    scripts: Arc<ScriptResults>,
    page_loads: Arc<PageLoads>,
}

impl ViewSurface {
    pub fn new(
        webview: Webview,
        scripts: Arc<ScriptResults>,
        page_loads: Arc<PageLoads>,
    ) -> Self {
        Self {
            webview,
            scripts,
            page_loads,
        }
    }
}

#[async_trait]
impl Surface for ViewSurface {
    fn label(&self) -> &str {
        self.webview.label()
    }

    fn kind(&self) -> SurfaceKind {
        SurfaceKind::EmbeddedView
    }

    async fn load_url(&self, url: &str) -> Result<(), SurfaceError> {
        let url = parse_url(url)?;
        self.page_loads
            .navigate(self.webview.label(), || {
                self.webview.navigate(url).map_err(platform)
            })
            .await
    }

    async fn execute(&self, script: &str) -> Result<(), SurfaceError> {
        self.webview
            .eval(script)
            .map_err(|e| SurfaceError::Script(e.to_string()))
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, SurfaceError> {
        self.scripts
            .evaluate(expression, |script| {
                self.webview
                    .eval(script)
                    .map_err(|e| SurfaceError::Script(e.to_string()))
            })
            .await
    }

    async fn bounds(&self) -> Result<Bounds, SurfaceError> {
        let position = self.webview.position().map_err(platform)?;
        let size = self.webview.size().map_err(platform)?;
        Ok(to_bounds(position, size))
    }

    async fn set_bounds(&self, bounds: Bounds) -> Result<(), SurfaceError> {
        self.webview
            .set_position(PhysicalPosition::new(bounds.x, bounds.y))
            .map_err(platform)?;
        self.webview
            .set_size(PhysicalSize::new(bounds.width, bounds.height))
            .map_err(platform)
    }

    async fn reveal(&self) -> Result<(), SurfaceError> {
        // Views are shown and hidden through their bounds.
        Ok(())
    }

    /// Snapshot of the host window cropped to this view.
    async fn capture(&self) -> Result<CapturedFrame, SurfaceError> {
        #[cfg(desktop)]
        {
            let title = self.webview.window().title().map_err(platform)?;
            let region = self.bounds().await?;
            let frame = super::snapshot::capture_window_titled_async(title).await?;
            Ok(super::snapshot::crop(&frame, region))
        }

        #[cfg(mobile)]
        {
            Err(SurfaceError::Snapshot("not supported on this platform".to_string()))
        }
    }
}
