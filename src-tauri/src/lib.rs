//! YouTube Remix Stage Tauri application.

mod commands;
mod logging;
mod state;
mod surface;
mod windows;

use remix_stage_core::bootstrap::{connect_dev_server, ProbeError};
use remix_stage_core::bridge::{MAIN_VIEW_LABEL, OAUTH_CALLBACK_EVENT};
use remix_stage_core::config::{load_config, RunMode};
use remix_stage_core::deep_link::is_callback_url;
#[cfg(any(windows, target_os = "linux"))]
use remix_stage_core::deep_link::CALLBACK_SCHEME;
use remix_stage_core::{FrameCaptureService, PlaybackDispatcher, SearchClient};
use state::StageContext;
use std::sync::Arc;
use surface::{permission, PageLoads, ScriptResults};
use tauri::{AppHandle, Emitter, EventTarget, Manager, WindowEvent};
use tracing::{error, info, warn};

/// Forward an OAuth callback URL to the main view.
fn forward_callback(app: &AppHandle, url: &str) {
    if !is_callback_url(url) {
        return;
    }
    info!("Forwarding OAuth callback");
    if let Err(e) = app.emit_to(
        EventTarget::webview(MAIN_VIEW_LABEL),
        OAUTH_CALLBACK_EVENT,
        url.to_string(),
    ) {
        warn!("Failed to forward OAuth callback: {}", e);
    }
}

/// Probe the dev server until it answers, then point the main view at it.
async fn attach_dev_server(app: AppHandle, url: String) {
    let client = reqwest::Client::new();
    let result = connect_dev_server(|| {
        let request = client.get(&url).send();
        async move {
            match request.await {
                Ok(_) => Ok(()),
                Err(e) if e.is_connect() => Err(ProbeError::Connection(e.to_string())),
                Err(e) => Err(ProbeError::Other(e.to_string())),
            }
        }
    })
    .await;

    if let Err(e) = result {
        error!("{}", e);
        windows::show_main_window(&app);
        return;
    }

    let Some(view) = app.get_webview(MAIN_VIEW_LABEL) else {
        return;
    };
    match url.parse() {
        Ok(parsed) => {
            if let Err(e) = view.navigate(parsed) {
                error!("Failed to load dev server: {}", e);
            }
            view.open_devtools();
        }
        Err(e) => error!(%url, "Invalid dev server URL: {}", e),
    }
}

fn setup(app: &mut tauri::App) -> Result<(), Box<dyn std::error::Error>> {
    let handle = app.handle().clone();
    let config = load_config();
    let run_mode = RunMode::from_env();
    info!(?run_mode, "Starting YouTube Remix Stage");

    #[cfg(any(windows, target_os = "linux"))]
    {
        use tauri_plugin_deep_link::DeepLinkExt;
        if let Err(e) = app.deep_link().register(CALLBACK_SCHEME) {
            warn!("Failed to register URL scheme: {}", e);
        }
    }
    {
        use tauri_plugin_deep_link::DeepLinkExt;
        let links = handle.clone();
        app.deep_link().on_open_url(move |event| {
            for url in event.urls() {
                forward_callback(&links, url.as_str());
            }
        });
    }

    let scripts = Arc::new(ScriptResults::new());
    let page_loads = Arc::new(PageLoads::new());
    let registry = Arc::new(windows::build_stage(
        &handle,
        &config,
        run_mode,
        &scripts,
        &page_loads,
    )?);

    #[cfg(desktop)]
    let sources = Arc::new(surface::snapshot::XcapSources);
    #[cfg(mobile)]
    let sources = Arc::new(NoSources);

    let context = StageContext {
        dispatcher: PlaybackDispatcher::new(Arc::clone(&registry))
            .with_settle_delay(config.playback.settle_delay()),
        capture: FrameCaptureService::new(
            Arc::clone(&registry),
            permission::platform_access(),
            sources,
            config.capture.app_title_markers.clone(),
        ),
        search: SearchClient::with_endpoint(config.search.endpoint.clone())
            .timeout(config.search.timeout()),
        registry,
        scripts,
        page_loads,
        config,
    };

    if run_mode.is_development() {
        let url = context.config.dev_server.url.clone();
        tauri::async_runtime::spawn(attach_dev_server(handle.clone(), url));
    }

    app.manage(context);
    Ok(())
}

fn on_window_event(window: &tauri::Window, event: &WindowEvent) {
    if let WindowEvent::Destroyed = event {
        if let Some(ctx) = window.try_state::<StageContext>() {
            ctx.page_loads.close(window.label());
        }
    }
    if window.label() != windows::MAIN_WINDOW_LABEL {
        return;
    }
    match event {
        WindowEvent::Resized(size) => {
            if let Some(ctx) = window.try_state::<StageContext>() {
                windows::layout(window.app_handle(), *size, ctx.registry.routing());
            }
        }
        WindowEvent::Destroyed => {
            // The hidden capture windows would otherwise keep the app alive.
            window.app_handle().exit(0);
        }
        _ => {}
    }
}

#[cfg(mobile)]
struct NoSources;

#[cfg(mobile)]
#[async_trait::async_trait]
impl remix_stage_core::capture::SourceEnumerator for NoSources {
    async fn sources(
        &self,
    ) -> Result<Vec<remix_stage_core::capture::CaptureSource>, remix_stage_core::SurfaceError> {
        Ok(Vec::new())
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let _log_guard = logging::init();

    let builder = tauri::Builder::default();

    // Must be the first plugin so a second launch exits before doing any work.
    #[cfg(desktop)]
    let builder = builder.plugin(tauri_plugin_single_instance::init(|app, argv, _cwd| {
        info!("Second instance launched");
        if let Some(url) = remix_stage_core::deep_link::find_callback_url(&argv) {
            forward_callback(app, url);
        }
        windows::show_main_window(app);
    }));

    builder
        .plugin(tauri_plugin_deep_link::init())
        .plugin(tauri_plugin_opener::init())
        .setup(setup)
        .on_window_event(on_window_event)
        .invoke_handler(tauri::generate_handler![
            // Playback
            commands::youtube_load_video,
            commands::youtube_play,
            commands::youtube_pause,
            commands::youtube_set_volume,
            commands::youtube_get_current_time,
            commands::youtube_seek_to,
            commands::youtube_search,
            // Capture
            commands::capture_youtube_window,
            commands::capture_youtube_view,
            commands::capture_view,
            commands::get_desktop_sources,
            commands::check_screen_recording_permission,
            commands::open_screen_recording_settings,
            // Player view reports
            commands::youtube_player_state,
            commands::youtube_player_event,
            commands::surface_script_result,
            commands::open_devtools,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
