//! Shared application state for axum handlers.

use std::sync::Arc;

use lumen_app::ports::{LightBackend, SceneRepository};
use lumen_app::services::light_service::LightService;
use lumen_app::services::registry::LightRegistry;
use lumen_app::services::scene_service::SceneService;

/// Application state shared across all axum handlers.
///
/// Generic over the backend and scene repository types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` wrappers are
/// cloned.
pub struct AppState<B: LightBackend, R> {
    /// Light registry, for snapshot and refresh reads.
    pub registry: Arc<LightRegistry<B>>,
    /// Per-bulb and bulk mutation service.
    pub light_service: Arc<LightService<B>>,
    /// Scene CRUD and replay service.
    pub scene_service: Arc<SceneService<B, R>>,
}

impl<B: LightBackend, R> Clone for AppState<B, R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            light_service: Arc::clone(&self.light_service),
            scene_service: Arc::clone(&self.scene_service),
        }
    }
}

impl<B: LightBackend, R: SceneRepository> AppState<B, R> {
    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// The registry is shared with the refresh scheduler, so everything
    /// arrives already `Arc`ed from the composition root.
    pub fn new(
        registry: Arc<LightRegistry<B>>,
        light_service: Arc<LightService<B>>,
        scene_service: Arc<SceneService<B, R>>,
    ) -> Self {
        Self {
            registry,
            light_service,
            scene_service,
        }
    }
}
