//! YouTube Remix Stage core library
//!
//! Layer registry, playback command dispatch, frame capture and search for the
//! Remix Stage desktop shell. Nothing in here depends on Tauri: the shell
//! implements [`surface::Surface`] for its webviews and windows and hands them
//! to the [`registry::LayerRegistry`].

pub mod bootstrap;
pub mod bridge;
pub mod capture;
pub mod config;
pub mod deep_link;
pub mod dispatcher;
pub mod layer;
pub mod load_gate;
pub mod logging;
pub mod registry;
pub mod search;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;

pub use capture::{CaptureError, FrameCaptureService, LayerCapture};
pub use dispatcher::{DispatchError, PlaybackDispatcher};
pub use layer::{Bounds, LayerId, LayerRef};
pub use load_gate::{GateTransition, LoadGate};
pub use registry::{LayerRegistry, LegacyViewRouting, RegistryBuilder, RegistryError};
pub use search::{SearchClient, SearchError};
pub use surface::{CapturedFrame, Surface, SurfaceError, SurfaceKind};
