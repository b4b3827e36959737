//! Application context shared by every command.

use crate::surface::{PageLoads, ScriptResults};
use remix_stage_core::config::StageConfig;
use remix_stage_core::{FrameCaptureService, LayerRegistry, PlaybackDispatcher, SearchClient};
use std::sync::Arc;

/// Built once in `setup` and managed by Tauri for the app's lifetime.
pub struct StageContext {
    pub registry: Arc<LayerRegistry>,
    pub dispatcher: PlaybackDispatcher,
    pub capture: FrameCaptureService,
    pub search: SearchClient,
    pub scripts: Arc<ScriptResults>,
    pub page_loads: Arc<PageLoads>,
    pub config: StageConfig,
}
