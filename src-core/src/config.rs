//! Configuration management for Remix Stage.
//!
//! Handles loading and saving user configuration to platform-standard config directories:
//! - Linux: `~/.config/remix-stage/config.json`
//! - macOS: `~/Library/Application Support/remix-stage/config.json`
//! - Windows: `%APPDATA%\remix-stage\config.json`

use crate::dispatcher::DEFAULT_SETTLE_DELAY;
use crate::registry::LegacyViewRouting;
use crate::search::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const APP_NAME: &str = "remix-stage";

/// Whether the UI comes from the dev server or the packaged bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    /// `NODE_ENV=development` selects development; anything else is production.
    pub fn from_env() -> Self {
        Self::from_node_env(std::env::var("NODE_ENV").ok().as_deref())
    }

    pub fn from_node_env(value: Option<&str>) -> Self {
        match value {
            Some("development") => Self::Development,
            _ => Self::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

/// Playback-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Delay between loading a video and forcing it paused.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY.as_millis() as u64
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl PlaybackConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Layer surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LayersConfig {
    /// How layer requests reach the embedded player view.
    #[serde(default)]
    pub legacy_view_routing: LegacyViewRouting,
}

/// Search client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

fn default_search_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_search_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_search_timeout_secs(),
            endpoint: default_search_endpoint(),
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Development server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevServerConfig {
    #[serde(default = "default_dev_server_url")]
    pub url: String,
}

fn default_dev_server_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            url: default_dev_server_url(),
        }
    }
}

/// Capture-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Substrings that identify this app's own window among desktop sources.
    #[serde(default = "default_app_title_markers")]
    pub app_title_markers: Vec<String>,
}

fn default_app_title_markers() -> Vec<String> {
    vec!["YouTube Remix Stage".to_string(), APP_NAME.to_string()]
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            app_title_markers: default_app_title_markers(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StageConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub layers: LayersConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub dev_server: DevServerConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Get the path to the config file.
pub fn config_path() -> Result<PathBuf, String> {
    let proj_dirs =
        ProjectDirs::from("", "", APP_NAME).ok_or("Could not determine config directory")?;
    Ok(proj_dirs.config_dir().join("config.json"))
}

/// Load configuration from the platform config directory.
/// Returns defaults if the file doesn't exist or is invalid.
pub fn load_config() -> StageConfig {
    match config_path() {
        Ok(path) => load_config_from(&path),
        Err(e) => {
            warn!("Failed to get config path: {}", e);
            StageConfig::default()
        }
    }
}

/// Load configuration from a specific file.
pub fn load_config_from(path: &Path) -> StageConfig {
    if !path.exists() {
        info!("No config file found, using defaults");
        return StageConfig::default();
    }

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<StageConfig>(&contents) {
            Ok(config) => {
                info!(?path, "Loaded config");
                config
            }
            Err(e) => {
                warn!("Failed to parse config file: {}. Using defaults.", e);
                StageConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}. Using defaults.", e);
            StageConfig::default()
        }
    }
}
