//! Rendering surfaces that back a layer.
//!
//! A surface is either a webview embedded in the main window or a dedicated
//! top-level window. The registry, dispatcher and capture service only see
//! this trait, never the concrete handle.

use crate::layer::Bounds;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Which kind of host a surface lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    /// Child webview sharing the main window, hidden by moving its bounds.
    EmbeddedView,
    /// Independent frameless window kept off-screen for capture.
    DedicatedWindow,
}

/// Errors raised by a surface call.
#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Surface {0} is closed")]
    Closed(String),
    #[error("Navigation failed: {0}")]
    Navigation(String),
    #[error("Script failed: {0}")]
    Script(String),
    #[error("Script result not received in time")]
    ScriptTimeout,
    #[error("Snapshot failed: {0}")]
    Snapshot(String),
    #[error("Platform error: {0}")]
    Platform(String),
}

/// A captured bitmap.
#[derive(Clone)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, row-major, no padding
    pub data: Vec<u8>,
}

impl CapturedFrame {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}

impl std::fmt::Debug for CapturedFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapturedFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// Capability set of a rendering surface.
#[async_trait]
pub trait Surface: Send + Sync {
    /// Stable label of the underlying webview or window.
    fn label(&self) -> &str;

    fn kind(&self) -> SurfaceKind;

    /// Navigate the surface to a URL and wait until the new page has
    /// finished loading, so scripts run afterwards reach that page.
    async fn load_url(&self, url: &str) -> Result<(), SurfaceError>;

    /// Run a script in the loaded page without waiting for a result.
    async fn execute(&self, script: &str) -> Result<(), SurfaceError>;

    /// Evaluate an expression in the loaded page and return its JSON value.
    async fn evaluate(&self, expression: &str) -> Result<Value, SurfaceError>;

    async fn bounds(&self) -> Result<Bounds, SurfaceError>;

    async fn set_bounds(&self, bounds: Bounds) -> Result<(), SurfaceError>;

    /// Make the surface render if it is hidden. Embedded views are positioned
    /// rather than shown, so for them this does nothing.
    async fn reveal(&self) -> Result<(), SurfaceError>;

    /// Snapshot the currently rendered content.
    async fn capture(&self) -> Result<CapturedFrame, SurfaceError>;
}
