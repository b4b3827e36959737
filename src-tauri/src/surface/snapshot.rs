//! OS-level window and screen snapshots via xcap.
//!
//! Webviews cannot snapshot themselves, so a surface is captured by grabbing
//! its top-level OS window. All xcap calls block and must run on a blocking
//! thread.

use async_trait::async_trait;
use remix_stage_core::capture::encode::{fit_frame, APP_THUMBNAIL_MAX};
use remix_stage_core::capture::{CaptureSource, SourceEnumerator, SourceKind};
use remix_stage_core::{Bounds, CapturedFrame, SurfaceError};
use tracing::{debug, warn};

/// Whether an OS window is this process's window with the wanted title.
/// Titles alone are not unique across processes.
fn is_own_window(pid: u32, title: &str, wanted: &str) -> bool {
    pid == std::process::id() && title == wanted
}

/// Capture this process's OS window with the given title.
pub fn capture_window_titled(title: &str) -> Result<CapturedFrame, SurfaceError> {
    let windows = xcap::Window::all().map_err(|e| SurfaceError::Platform(e.to_string()))?;
    let window = windows
        .into_iter()
        .find(|w| is_own_window(w.pid(), w.title(), title))
        .ok_or_else(|| SurfaceError::Snapshot(format!("no OS window titled {:?}", title)))?;
    let image = window
        .capture_image()
        .map_err(|e| SurfaceError::Snapshot(e.to_string()))?;
    Ok(CapturedFrame {
        width: image.width(),
        height: image.height(),
        data: image.into_raw(),
    })
}

/// Run a blocking snapshot off the async runtime.
pub async fn capture_window_titled_async(title: String) -> Result<CapturedFrame, SurfaceError> {
    tokio::task::spawn_blocking(move || capture_window_titled(&title))
        .await
        .map_err(|e| SurfaceError::Platform(e.to_string()))?
}

/// Cut `region` out of a frame, clipped to the frame. The result is empty
/// when the region lies entirely outside.
pub fn crop(frame: &CapturedFrame, region: Bounds) -> CapturedFrame {
    let x0 = region.x.clamp(0, frame.width as i32) as u32;
    let y0 = region.y.clamp(0, frame.height as i32) as u32;
    let x1 = (region.x as i64 + region.width as i64).clamp(0, frame.width as i64) as u32;
    let y1 = (region.y as i64 + region.height as i64).clamp(0, frame.height as i64) as u32;

    let width = x1.saturating_sub(x0);
    let height = y1.saturating_sub(y0);
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    let stride = frame.width as usize * 4;
    for row in y0..y0 + height {
        let start = row as usize * stride + x0 as usize * 4;
        let end = start + width as usize * 4;
        if end > frame.data.len() {
            break;
        }
        data.extend_from_slice(&frame.data[start..end]);
    }

    CapturedFrame {
        width,
        height,
        data,
    }
}

/// Desktop sources from xcap: every visible window, then every monitor.
pub struct XcapSources;

impl XcapSources {
    fn enumerate() -> Result<Vec<CaptureSource>, SurfaceError> {
        let mut sources = Vec::new();

        let windows = xcap::Window::all().map_err(|e| SurfaceError::Platform(e.to_string()))?;
        for window in windows.iter().filter(|w| !w.is_minimized()) {
            let name = if window.title().is_empty() {
                window.app_name().to_string()
            } else {
                window.title().to_string()
            };
            if name.is_empty() {
                continue;
            }
            let thumbnail = match window.capture_image() {
                Ok(image) => Some(thumbnail_frame(image.width(), image.height(), image.into_raw())),
                Err(e) => {
                    debug!(%name, "Window snapshot failed: {}", e);
                    None
                }
            };
            sources.push(CaptureSource {
                id: format!("window:{}", window.id()),
                name,
                kind: SourceKind::Window,
                thumbnail,
            });
        }

        let monitors = xcap::Monitor::all().map_err(|e| SurfaceError::Platform(e.to_string()))?;
        for (index, monitor) in monitors.iter().enumerate() {
            let thumbnail = match monitor.capture_image() {
                Ok(image) => Some(thumbnail_frame(image.width(), image.height(), image.into_raw())),
                Err(e) => {
                    warn!(monitor = monitor.name(), "Monitor snapshot failed: {}", e);
                    None
                }
            };
            sources.push(CaptureSource {
                id: format!("screen:{}", monitor.id()),
                name: format!("Screen {} ({})", index + 1, monitor.name()),
                kind: SourceKind::Screen,
                thumbnail,
            });
        }

        Ok(sources)
    }
}

fn thumbnail_frame(width: u32, height: u32, data: Vec<u8>) -> CapturedFrame {
    let (max_w, max_h) = APP_THUMBNAIL_MAX;
    fit_frame(
        CapturedFrame {
            width,
            height,
            data,
        },
        max_w,
        max_h,
    )
}

#[async_trait]
impl SourceEnumerator for XcapSources {
    async fn sources(&self) -> Result<Vec<CaptureSource>, SurfaceError> {
        tokio::task::spawn_blocking(Self::enumerate)
            .await
            .map_err(|e| SurfaceError::Platform(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_frame(width: u32, height: u32) -> CapturedFrame {
        // Each pixel's red channel holds its index
        let data = (0..width * height)
            .flat_map(|i| [i as u8, 0, 0, 255])
            .collect();
        CapturedFrame {
            width,
            height,
            data,
        }
    }

    #[test]
    fn test_only_own_windows_match_a_title() {
        let own = std::process::id();
        assert!(is_own_window(own, "YouTube Layer A", "YouTube Layer A"));
        assert!(!is_own_window(own.wrapping_add(1), "YouTube Layer A", "YouTube Layer A"));
        assert!(!is_own_window(own, "YouTube Layer B", "YouTube Layer A"));
    }

    #[test]
    fn test_crop_inside() {
        let frame = numbered_frame(4, 4);
        let cropped = crop(&frame, Bounds::new(1, 1, 2, 2));
        assert_eq!((cropped.width, cropped.height), (2, 2));
        let reds: Vec<u8> = cropped.data.chunks(4).map(|p| p[0]).collect();
        assert_eq!(reds, vec![5, 6, 9, 10]);
    }

    #[test]
    fn test_crop_clips_to_frame() {
        let frame = numbered_frame(4, 4);
        let cropped = crop(&frame, Bounds::new(-2, 2, 4, 10));
        assert_eq!((cropped.width, cropped.height), (2, 2));
        assert_eq!(cropped.data.len(), 16);
    }

    #[test]
    fn test_crop_parked_region_is_empty() {
        let frame = numbered_frame(4, 4);
        let cropped = crop(&frame, Bounds::new(-1000, -1000, 1, 1));
        assert!(cropped.is_empty());
    }
}
