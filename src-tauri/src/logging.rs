//! Tracing setup: stderr plus a daily rolling file in the platform log dir.

use remix_stage_core::logging::{ensure_log_dir, APP_LOG_PREFIX};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,remix_stage_lib=debug,remix_stage_core=debug";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the app. When the log directory is unusable only stderr is logged.
pub fn init() -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr = fmt::layer().with_writer(std::io::stderr);

    let file = ensure_log_dir()
        .map_err(|e| e.to_string())
        .and_then(|dir| {
            Builder::new()
                .rotation(Rotation::DAILY)
                .filename_prefix(APP_LOG_PREFIX)
                .filename_suffix("log")
                .build(&dir)
                .map_err(|e| e.to_string())
        });

    match file {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
            let installed = tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .with(file_layer)
                .try_init();
            installed.ok().map(|_| guard)
        }
        Err(e) => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(stderr)
                .try_init();
            tracing::warn!("File logging disabled: {}", e);
            None
        }
    }
}
