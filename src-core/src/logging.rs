//! Platform-specific logging directory resolution.

use crate::config::APP_NAME;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Returns the platform-appropriate directory for log files.
///
/// | Platform | Directory |
/// |----------|-----------|
/// | Linux | `$XDG_STATE_HOME/remix-stage/logs` or `~/.local/state/remix-stage/logs` |
/// | macOS | `~/Library/Logs/remix-stage` |
/// | Windows | `%LOCALAPPDATA%\remix-stage\logs` |
///
/// Falls back to a directory under the system temp dir when no home
/// directory can be determined.
pub fn log_dir() -> PathBuf {
    let Some(base) = ProjectDirs::from("", "", APP_NAME) else {
        return std::env::temp_dir().join(APP_NAME).join("logs");
    };

    #[cfg(target_os = "linux")]
    {
        base.state_dir()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| base.data_local_dir().join("state"))
            .join("logs")
    }

    #[cfg(target_os = "macos")]
    {
        // data_local_dir is ~/Library/Application Support/remix-stage
        let library = base
            .data_local_dir()
            .parent()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| base.data_local_dir().to_path_buf());
        library.join("Logs").join(APP_NAME)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        base.data_local_dir().join("logs")
    }
}

/// Ensures the log directory exists, creating it if necessary.
pub fn ensure_log_dir() -> Result<PathBuf, std::io::Error> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// File name prefix for the rolling app log (`remix-stage.2026-03-01.log`).
pub const APP_LOG_PREFIX: &str = APP_NAME;
