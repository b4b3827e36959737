//! Window and view construction, layout, and initial-load gating.
//!
//! The main window hosts a full-bleed UI view plus the parked player view(s).
//! Each layer also gets a frameless capture window kept off-screen to the
//! left of the desktop.

use crate::state::StageContext;
use crate::surface::{PageLoads, ScriptResults, ViewSurface, WindowSurface};
use remix_stage_core::bridge::MAIN_VIEW_LABEL;
use remix_stage_core::config::{RunMode, StageConfig};
use remix_stage_core::{
    Bounds, GateTransition, LayerId, LayerRegistry, LegacyViewRouting, RegistryBuilder,
};
use std::sync::Arc;
use tauri::webview::{PageLoadEvent, PageLoadPayload, WebviewBuilder};
use tauri::window::WindowBuilder;
use tauri::{
    AppHandle, Manager, PhysicalPosition, PhysicalSize, Webview, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};
use tauri_plugin_opener::OpenerExt;
use tracing::{debug, info, warn};

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const MAIN_WINDOW_TITLE: &str = "YouTube Remix Stage";

const SHARED_VIEW_LABEL: &str = "youtube-view";

/// Where hidden player views sit.
const PARKED: Bounds = Bounds {
    x: -1000,
    y: -1000,
    width: 1,
    height: 1,
};

const CAPTURE_WINDOW_WIDTH: f64 = 1280.0;
const CAPTURE_WINDOW_HEIGHT: f64 = 720.0;
const CAPTURE_WINDOW_X: f64 = -1300.0;

const MAIN_VIEW_SCRIPT: &str = include_str!("../scripts/main-view.js");
const CAPTURE_WINDOW_SCRIPT: &str = include_str!("../scripts/capture-window.js");

struct CaptureWindowSpec {
    layer: LayerId,
    label: &'static str,
    title: &'static str,
    y: f64,
}

const CAPTURE_WINDOWS: [CaptureWindowSpec; 2] = [
    CaptureWindowSpec {
        layer: LayerId::Youtube1,
        label: "youtube-window-1",
        title: "YouTube Layer A",
        y: 0.0,
    },
    CaptureWindowSpec {
        layer: LayerId::Youtube2,
        label: "youtube-window-2",
        title: "YouTube Layer B",
        y: 750.0,
    },
];

/// Labels of the embedded player views for a routing policy.
pub fn player_view_labels(routing: LegacyViewRouting) -> Vec<(Option<LayerId>, String)> {
    match routing {
        LegacyViewRouting::Shared => vec![(None, SHARED_VIEW_LABEL.to_string())],
        LegacyViewRouting::PerLayer => LayerId::ALL
            .iter()
            .enumerate()
            .map(|(i, id)| (Some(*id), format!("{}-{}", SHARED_VIEW_LABEL, i + 1)))
            .collect(),
    }
}

/// Create every window and view and register them as layer surfaces.
pub fn build_stage(
    app: &AppHandle,
    config: &StageConfig,
    run_mode: RunMode,
    scripts: &Arc<ScriptResults>,
    page_loads: &Arc<PageLoads>,
) -> Result<LayerRegistry, Box<dyn std::error::Error>> {
    let routing = config.layers.legacy_view_routing;

    let main_window = WindowBuilder::new(app, MAIN_WINDOW_LABEL)
        .title(MAIN_WINDOW_TITLE)
        .inner_size(1600.0, 1000.0)
        .min_inner_size(1400.0, 800.0)
        .center()
        .resizable(true)
        .visible(false)
        .build()?;
    let size = main_window.inner_size()?;

    // In development the dev server is attached once it answers.
    let main_url = match run_mode {
        RunMode::Development => WebviewUrl::External("about:blank".parse()?),
        RunMode::Production => WebviewUrl::App("index.html".into()),
    };
    let links = app.clone();
    let dev_url = config.dev_server.url.clone();
    let main_view = WebviewBuilder::new(MAIN_VIEW_LABEL, main_url)
        .initialization_script(MAIN_VIEW_SCRIPT)
        .on_navigation(move |url| {
            if is_app_url(url, &dev_url) {
                return true;
            }
            // External links go to the system browser, never into the UI view.
            if let Err(e) = links.opener().open_url(url.as_str(), None::<&str>) {
                warn!(%url, "Failed to open external link: {}", e);
            }
            false
        })
        .on_page_load(|webview: Webview, payload: PageLoadPayload<'_>| {
            on_page_load(webview.app_handle(), webview.label(), &payload)
        });
    main_window.add_child(main_view, PhysicalPosition::new(0, 0), size)?;

    let mut builder = RegistryBuilder::default()
        .routing(routing)
        .track(MAIN_VIEW_LABEL);

    for (layer, label) in player_view_labels(routing) {
        let view = WebviewBuilder::new(&label, WebviewUrl::App("youtube.html".into()))
            .initialization_script(&player_layer_script(layer))
            .on_page_load(|webview: Webview, payload: PageLoadPayload<'_>| {
                on_page_load(webview.app_handle(), webview.label(), &payload)
            });
        let view = main_window.add_child(
            view,
            PhysicalPosition::new(PARKED.x, PARKED.y),
            PhysicalSize::new(PARKED.width, PARKED.height),
        )?;
        let surface = Arc::new(ViewSurface::new(
            view,
            Arc::clone(scripts),
            Arc::clone(page_loads),
        ));
        builder = match layer {
            Some(id) => builder.view(id, surface),
            None => builder.shared_view(surface),
        };
        debug!(%label, "Created player view");
    }

    for spec in &CAPTURE_WINDOWS {
        let window = WebviewWindowBuilder::new(
            app,
            spec.label,
            WebviewUrl::App("youtube-player.html".into()),
        )
        .title(spec.title)
        .inner_size(CAPTURE_WINDOW_WIDTH, CAPTURE_WINDOW_HEIGHT)
        .position(CAPTURE_WINDOW_X, spec.y)
        .decorations(false)
        .resizable(false)
        .skip_taskbar(true)
        .visible(false)
        .initialization_script(CAPTURE_WINDOW_SCRIPT)
        .on_page_load(|window: WebviewWindow, payload: PageLoadPayload<'_>| {
            on_page_load(window.app_handle(), window.label(), &payload)
        })
        .build()?;
        let surface = Arc::new(WindowSurface::new(
            window,
            Arc::clone(scripts),
            Arc::clone(page_loads),
        ));
        builder = builder.window(spec.layer, surface);
        debug!(label = spec.label, "Created capture window");
    }

    let registry = builder.build()?;
    info!(?registry, "Stage surfaces created");
    Ok(registry)
}

/// Whether a URL belongs to the bundled UI or the dev server.
fn is_app_url(url: &tauri::Url, dev_url: &str) -> bool {
    matches!(url.scheme(), "tauri" | "about" | "data")
        || url.host_str() == Some("tauri.localhost")
        || (!dev_url.is_empty() && url.as_str().starts_with(dev_url))
}

/// Names the layer a player view serves, for its event reports.
fn player_layer_script(layer: Option<LayerId>) -> String {
    let layer = serde_json::to_string(&layer).unwrap_or_else(|_| "null".to_string());
    format!("window.__REMIX_STAGE_LAYER__ = {};", layer)
}

fn on_page_load(app: &AppHandle, label: &str, payload: &PageLoadPayload<'_>) {
    if payload.event() != PageLoadEvent::Finished {
        return;
    }
    let url = payload.url().as_str();
    if url == "about:blank" {
        return;
    }

    let Some(ctx) = app.try_state::<StageContext>() else {
        warn!(label, "Page loaded before the stage context was ready");
        return;
    };
    ctx.page_loads.finished(label, url);
    match ctx.registry.load_gate().mark_loaded(label) {
        GateTransition::Opened => show_main_window(app),
        GateTransition::Waiting { remaining } => {
            debug!(label, remaining, "Waiting for surfaces to load")
        }
        GateTransition::AlreadyOpen | GateTransition::Ignored => {}
    }
}

/// Show, restore and focus the main window.
pub fn show_main_window(app: &AppHandle) {
    let Some(window) = app.get_window(MAIN_WINDOW_LABEL) else {
        return;
    };
    if let Err(e) = window.show() {
        warn!("Failed to show main window: {}", e);
    }
    if window.is_minimized().unwrap_or(false) {
        let _ = window.unminimize();
    }
    let _ = window.set_focus();
}

/// Keep the UI view full-bleed and the player views parked.
pub fn layout(app: &AppHandle, size: PhysicalSize<u32>, routing: LegacyViewRouting) {
    if let Some(main_view) = app.get_webview(MAIN_VIEW_LABEL) {
        let _ = main_view.set_position(PhysicalPosition::new(0, 0));
        let _ = main_view.set_size(size);
    }
    for (_, label) in player_view_labels(routing) {
        if let Some(view) = app.get_webview(&label) {
            let _ = view.set_position(PhysicalPosition::new(PARKED.x, PARKED.y));
            let _ = view.set_size(PhysicalSize::new(PARKED.width, PARKED.height));
        }
    }
}
