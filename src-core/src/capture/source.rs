//! Capturable desktop sources (windows and screens).

use crate::surface::{CapturedFrame, SurfaceError};
use async_trait::async_trait;
use serde::Serialize;

/// Source category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Window,
    Screen,
}

/// One capturable source as reported by the platform.
#[derive(Debug, Clone)]
pub struct CaptureSource {
    /// Platform id, `window:<n>` or `screen:<n>`.
    pub id: String,
    /// Window title or monitor name.
    pub name: String,
    pub kind: SourceKind,
    /// Full-size snapshot, when the platform could take one.
    pub thumbnail: Option<CapturedFrame>,
}

/// Enumerates capturable sources.
#[async_trait]
pub trait SourceEnumerator: Send + Sync {
    async fn sources(&self) -> Result<Vec<CaptureSource>, SurfaceError>;
}

/// Result of locating the application's own window among desktop sources.
#[derive(Debug, Clone, Serialize)]
pub struct AppWindowCapture {
    pub id: String,
    pub name: String,
    /// PNG data URL, empty when the source had no thumbnail.
    pub thumbnail: String,
}

/// Entry in the desktop source list.
#[derive(Debug, Clone, Serialize)]
pub struct DesktopSource {
    pub id: String,
    pub name: String,
    pub kind: SourceKind,
    pub thumbnail: String,
}

/// Pick the source to use for a whole-application capture.
///
/// First a source whose name contains any of `markers`, then one whose name
/// contains `Screen`, then the first source. `None` only for an empty list.
pub fn select_app_source<'a>(
    sources: &'a [CaptureSource],
    markers: &[String],
) -> Option<&'a CaptureSource> {
    sources
        .iter()
        .find(|s| markers.iter().any(|m| !m.is_empty() && s.name.contains(m.as_str())))
        .or_else(|| sources.iter().find(|s| s.name.contains("Screen")))
        .or_else(|| sources.first())
}
