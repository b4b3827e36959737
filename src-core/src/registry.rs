//! Layer registry: which surface backs which layer.
//!
//! Built once at startup, read-only afterwards. Dedicated capture windows are
//! keyed by [`LayerId`]; the embedded player view is routed through an
//! explicit [`LegacyViewRouting`] policy.

use crate::layer::{LayerId, LayerRef};
use crate::load_gate::LoadGate;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// How layer requests map onto the embedded player view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyViewRouting {
    /// One view shared by every known layer and by the unspecified layer.
    #[default]
    Shared,
    /// One view per known layer; the unspecified layer has no view.
    PerLayer,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Layer {0} already has a {1} registered")]
    DuplicateLayer(LayerId, &'static str),
    #[error("A shared player view is already registered")]
    DuplicateSharedView,
}

pub struct LayerRegistry {
    windows: HashMap<LayerId, Arc<dyn Surface>>,
    views: HashMap<LayerId, Arc<dyn Surface>>,
    shared_view: Option<Arc<dyn Surface>>,
    routing: LegacyViewRouting,
    gate: Arc<LoadGate>,
}

impl LayerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Dedicated capture window for a layer.
    pub fn resolve_surface(&self, layer: &LayerRef) -> Option<Arc<dyn Surface>> {
        let surface = layer
            .layer_id()
            .and_then(|id| self.windows.get(&id))
            .cloned();
        if surface.is_none() {
            debug!(%layer, "No dedicated window for layer");
        }
        surface
    }

    /// Embedded player view for a layer, per the routing policy.
    pub fn resolve_view(&self, layer: &LayerRef) -> Option<Arc<dyn Surface>> {
        let view = match (self.routing, layer) {
            (_, LayerRef::Unknown(_)) => None,
            (LegacyViewRouting::Shared, _) => self.shared_view.clone(),
            (LegacyViewRouting::PerLayer, LayerRef::Known(id)) => self.views.get(id).cloned(),
            (LegacyViewRouting::PerLayer, LayerRef::Default) => None,
        };
        if view.is_none() {
            debug!(%layer, routing = ?self.routing, "No player view for layer");
        }
        view
    }

    pub fn routing(&self) -> LegacyViewRouting {
        self.routing
    }

    /// Gate tracking the initial load of registered surfaces.
    pub fn load_gate(&self) -> Arc<LoadGate> {
        Arc::clone(&self.gate)
    }

    /// Labels of every registered surface, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .windows
            .values()
            .chain(self.views.values())
            .chain(self.shared_view.iter())
            .map(|s| s.label().to_string())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }
}

impl std::fmt::Debug for LayerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerRegistry")
            .field("surfaces", &self.labels())
            .field("routing", &self.routing)
            .finish()
    }
}

/// Collects surfaces before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    windows: HashMap<LayerId, Arc<dyn Surface>>,
    views: HashMap<LayerId, Arc<dyn Surface>>,
    shared_view: Option<Arc<dyn Surface>>,
    routing: LegacyViewRouting,
    tracked: Vec<String>,
    error: Option<RegistryError>,
}

impl RegistryBuilder {
    /// Register the dedicated capture window for a layer.
    pub fn window(mut self, layer: LayerId, surface: Arc<dyn Surface>) -> Self {
        if self.windows.contains_key(&layer) {
            self.error.get_or_insert(RegistryError::DuplicateLayer(layer, "window"));
        } else {
            self.tracked.push(surface.label().to_string());
            self.windows.insert(layer, surface);
        }
        self
    }

    /// Register a per-layer player view (used with [`LegacyViewRouting::PerLayer`]).
    pub fn view(mut self, layer: LayerId, surface: Arc<dyn Surface>) -> Self {
        if self.views.contains_key(&layer) {
            self.error.get_or_insert(RegistryError::DuplicateLayer(layer, "view"));
        } else {
            self.tracked.push(surface.label().to_string());
            self.views.insert(layer, surface);
        }
        self
    }

    /// Register the single shared player view (used with [`LegacyViewRouting::Shared`]).
    pub fn shared_view(mut self, surface: Arc<dyn Surface>) -> Self {
        if self.shared_view.is_some() {
            self.error.get_or_insert(RegistryError::DuplicateSharedView);
        } else {
            self.tracked.push(surface.label().to_string());
            self.shared_view = Some(surface);
        }
        self
    }

    pub fn routing(mut self, routing: LegacyViewRouting) -> Self {
        self.routing = routing;
        self
    }

    /// Add a label to the load gate without registering it as a layer surface
    /// (the main UI view).
    pub fn track(mut self, label: impl Into<String>) -> Self {
        self.tracked.push(label.into());
        self
    }

    pub fn build(self) -> Result<LayerRegistry, RegistryError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(LayerRegistry {
            windows: self.windows,
            views: self.views,
            shared_view: self.shared_view,
            routing: self.routing,
            gate: Arc::new(LoadGate::new(self.tracked)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceKind;
    use crate::testing::MockSurface;

    fn window(label: &str) -> Arc<MockSurface> {
        MockSurface::new(label, SurfaceKind::DedicatedWindow)
    }

    fn view(label: &str) -> Arc<MockSurface> {
        MockSurface::new(label, SurfaceKind::EmbeddedView)
    }

    fn same(a: &Arc<dyn Surface>, b: &Arc<MockSurface>) -> bool {
        a.label() == b.label()
            && std::ptr::eq(
                Arc::as_ptr(a) as *const u8,
                Arc::as_ptr(b) as *const u8,
            )
    }

    #[test]
    fn test_resolves_each_layer_to_its_window() {
        let w1 = window("youtube-window-1");
        let w2 = window("youtube-window-2");
        let registry = LayerRegistry::builder()
            .window(LayerId::Youtube1, w1.clone())
            .window(LayerId::Youtube2, w2.clone())
            .build()
            .unwrap();

        let r1 = registry.resolve_surface(&LayerId::Youtube1.into()).unwrap();
        let r2 = registry.resolve_surface(&LayerId::Youtube2.into()).unwrap();
        assert!(same(&r1, &w1));
        assert!(same(&r2, &w2));

        // Same identity on every resolution
        let again = registry.resolve_surface(&LayerId::Youtube1.into()).unwrap();
        assert!(Arc::ptr_eq(&r1, &again));
    }

    #[test]
    fn test_unknown_and_default_have_no_window() {
        let registry = LayerRegistry::builder()
            .window(LayerId::Youtube1, window("youtube-window-1"))
            .build()
            .unwrap();

        assert!(registry.resolve_surface(&LayerRef::Default).is_none());
        assert!(registry
            .resolve_surface(&LayerRef::from_request(Some("youtube3")))
            .is_none());
        assert!(registry.resolve_surface(&LayerId::Youtube2.into()).is_none());
    }

    #[test]
    fn test_duplicate_window_is_rejected() {
        let result = LayerRegistry::builder()
            .window(LayerId::Youtube1, window("a"))
            .window(LayerId::Youtube1, window("b"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateLayer(LayerId::Youtube1, "window")
        );
    }

    #[test]
    fn test_second_shared_view_is_rejected() {
        let result = LayerRegistry::builder()
            .shared_view(view("youtube-view"))
            .shared_view(view("youtube-view-extra"))
            .build();
        assert_eq!(result.unwrap_err(), RegistryError::DuplicateSharedView);
    }

    #[test]
    fn test_rejected_shared_view_is_not_tracked() {
        let builder = LayerRegistry::builder()
            .shared_view(view("youtube-view"))
            .shared_view(view("youtube-view-extra"));
        assert_eq!(builder.tracked, vec!["youtube-view".to_string()]);
    }

    #[test]
    fn test_shared_routing_serves_known_and_default() {
        let shared = view("youtube-view");
        let registry = LayerRegistry::builder()
            .shared_view(shared.clone())
            .build()
            .unwrap();
        assert_eq!(registry.routing(), LegacyViewRouting::Shared);

        for layer in [
            LayerRef::Default,
            LayerId::Youtube1.into(),
            LayerId::Youtube2.into(),
        ] {
            let resolved = registry.resolve_view(&layer).unwrap();
            assert!(same(&resolved, &shared), "layer {layer}");
        }
        assert!(registry
            .resolve_view(&LayerRef::from_request(Some("bogus")))
            .is_none());
    }

    #[test]
    fn test_per_layer_routing() {
        let v1 = view("youtube-view-1");
        let v2 = view("youtube-view-2");
        let registry = LayerRegistry::builder()
            .routing(LegacyViewRouting::PerLayer)
            .view(LayerId::Youtube1, v1.clone())
            .view(LayerId::Youtube2, v2.clone())
            .build()
            .unwrap();

        assert!(same(
            &registry.resolve_view(&LayerId::Youtube1.into()).unwrap(),
            &v1
        ));
        assert!(same(
            &registry.resolve_view(&LayerId::Youtube2.into()).unwrap(),
            &v2
        ));
        assert!(registry.resolve_view(&LayerRef::Default).is_none());
    }

    #[test]
    fn test_gate_tracks_registered_surfaces() {
        let registry = LayerRegistry::builder()
            .window(LayerId::Youtube1, window("youtube-window-1"))
            .shared_view(view("youtube-view"))
            .track("main-view")
            .build()
            .unwrap();

        let gate = registry.load_gate();
        assert_eq!(
            gate.pending(),
            vec!["main-view", "youtube-view", "youtube-window-1"]
        );
    }

    #[test]
    fn test_routing_config_names() {
        let parsed: LegacyViewRouting = serde_json::from_str("\"per_layer\"").unwrap();
        assert_eq!(parsed, LegacyViewRouting::PerLayer);
        assert_eq!(LegacyViewRouting::default(), LegacyViewRouting::Shared);
    }
}
