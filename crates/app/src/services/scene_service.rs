//! Scene CRUD, persistence, and replay.

use std::sync::Arc;

use lumen_domain::error::{LumenError, NotFoundError};
use lumen_domain::id::SceneId;
use lumen_domain::scene::{Scene, SceneAction, SceneRequest, SceneSummary};

use crate::ports::{LightBackend, LightHandle, SceneRepository};
use crate::services::registry::LightRegistry;

/// What to do when a requested address cannot be resolved while capturing
/// scene actions: creation aborts the whole scene, modification drops the
/// stale address and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnresolved {
    Abort,
    Skip,
}

/// Scene collection with whole-file persistence.
///
/// Mutating calls (`save`/`modify`/`delete`) assume a single writer; the
/// backing store is a full overwrite with no versioning, so concurrent
/// mutations racing is an accepted limitation. A persistence failure after
/// an in-memory mutation is surfaced but not rolled back.
pub struct SceneService<B: LightBackend, R> {
    registry: Arc<LightRegistry<B>>,
    repo: R,
    scenes: tokio::sync::RwLock<Vec<Scene>>,
}

impl<B: LightBackend, R: SceneRepository> SceneService<B, R> {
    /// Create an empty service; call [`load`](Self::load) before serving.
    pub fn new(registry: Arc<LightRegistry<B>>, repo: R) -> Self {
        Self {
            registry,
            repo,
            scenes: tokio::sync::RwLock::new(Vec::new()),
        }
    }

    /// Load the persisted collection, replacing the in-memory one.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Persistence`] when the backing file cannot be
    /// read or parsed. The binary treats this as fatal at startup.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> Result<(), LumenError> {
        let loaded = self.repo.load().await?;
        tracing::info!(count = loaded.len(), "loaded scenes");
        *self.scenes.write().await = loaded;
        Ok(())
    }

    /// Summaries of every scene, in collection order.
    pub async fn list(&self) -> Vec<SceneSummary> {
        self.scenes.read().await.iter().map(Scene::summarize).collect()
    }

    /// Create a scene capturing the live state of the requested bulbs.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Validation`] when the name is empty,
    /// [`LumenError::NotFound`] when any requested address is unknown
    /// (nothing is persisted in either case), or
    /// [`LumenError::Persistence`] when the write fails after the in-memory
    /// append.
    #[tracing::instrument(skip(self, req), fields(name = %req.name))]
    pub async fn save(&self, req: SceneRequest) -> Result<SceneId, LumenError> {
        let mut scene = Scene {
            id: SceneId::generate(),
            name: req.name,
            description: req.description,
            actions: Vec::new(),
            order: req.order,
        };
        scene.validate()?;

        for mac in req.actions.iter().filter(|mac| !mac.is_empty()) {
            if let Some(action) = self.snapshot_action(mac, OnUnresolved::Abort).await? {
                scene.actions.push(action);
            }
        }

        let id = scene.id.clone();
        let snapshot = {
            let mut scenes = self.scenes.write().await;
            scenes.push(scene);
            scenes.clone()
        };
        self.repo.persist(&snapshot).await?;
        Ok(id)
    }

    /// Replace a scene's metadata and rebuild its actions from live state.
    ///
    /// Unresolvable addresses are dropped from the rebuilt action list
    /// rather than aborting — the deliberate asymmetry with
    /// [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] when the scene id is unknown, or
    /// [`LumenError::Persistence`] when the write fails.
    #[tracing::instrument(skip(self, req), fields(id = %req.id))]
    pub async fn modify(&self, req: SceneRequest) -> Result<(), LumenError> {
        let id = SceneId::from_string(&req.id);
        if !self.scenes.read().await.iter().any(|s| s.id == id) {
            return Err(NotFoundError::scene(req.id).into());
        }

        let mut actions = Vec::new();
        for mac in req.actions.iter().filter(|mac| !mac.is_empty()) {
            if let Some(action) = self.snapshot_action(mac, OnUnresolved::Skip).await? {
                actions.push(action);
            }
        }

        let snapshot = {
            let mut scenes = self.scenes.write().await;
            let Some(scene) = scenes.iter_mut().find(|s| s.id == id) else {
                return Err(NotFoundError::scene(req.id).into());
            };
            scene.name = req.name;
            scene.description = req.description;
            scene.order = req.order;
            scene.actions = actions;
            scenes.clone()
        };
        self.repo.persist(&snapshot).await?;
        Ok(())
    }

    /// Remove a scene by id. Removing an unknown id is a no-op; the
    /// collection is persisted either way.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Persistence`] when the write fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &SceneId) -> Result<(), LumenError> {
        let snapshot = {
            let mut scenes = self.scenes.write().await;
            scenes.retain(|s| &s.id != id);
            scenes.clone()
        };
        self.repo.persist(&snapshot).await?;
        Ok(())
    }

    /// Replay a scene's stored actions against the live bulbs.
    ///
    /// Actions run sequentially in stored order, each independent of its
    /// siblings: an unresolvable address or a rejected command is logged and
    /// the next action runs. Colors are applied with an immediate (zero
    /// duration) transition.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] when the scene id is unknown.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, id: &SceneId) -> Result<(), LumenError> {
        let scene = self
            .scenes
            .read()
            .await
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| NotFoundError::scene(id.as_str()))?;

        tracing::info!(name = %scene.name, "running scene");
        for action in &scene.actions {
            let light = match self.registry.find(&action.mac) {
                Ok(light) => light,
                Err(err) => {
                    tracing::warn!(mac = %action.mac, error = %err, "skipping scene action");
                    continue;
                }
            };
            let mut state = light.guard().await;
            match light.handle().set_power(action.state).await {
                Ok(()) => state.power = action.state,
                Err(err) => {
                    tracing::warn!(mac = %action.mac, power = action.state, error = %err, "unable to set power state");
                }
            }
            let color = action.color();
            match light.handle().set_color(color, 0).await {
                Ok(()) => state.color = color,
                Err(err) => {
                    tracing::warn!(mac = %action.mac, colour = %color, error = %err, "unable to set colour");
                }
            }
        }
        Ok(())
    }

    /// Resolve `mac`, pull its live state into the cache, and record a
    /// [`SceneAction`] from the (possibly stale, when the refresh fails)
    /// cached values.
    async fn snapshot_action(
        &self,
        mac: &str,
        on_unresolved: OnUnresolved,
    ) -> Result<Option<SceneAction>, LumenError> {
        let light = match self.registry.find(mac) {
            Ok(light) => light,
            Err(err) => match on_unresolved {
                OnUnresolved::Abort => return Err(err.into()),
                OnUnresolved::Skip => {
                    tracing::warn!(mac, error = %err, "dropping unresolvable scene action");
                    return Ok(None);
                }
            },
        };
        if let Err(err) = self.registry.refresh_one(mac).await {
            tracing::warn!(mac, error = %err, "unable to refresh light, using cached values");
        }
        let state = light.guard().await;
        Ok(Some(SceneAction::capture(mac, state.power, state.color)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use lumen_domain::color::Hsbk;
    use lumen_domain::error::PersistenceError;

    use crate::testing::{FakeBackend, FakeBulb};

    use super::*;

    /// In-memory stand-in for the YAML repository. Cloning shares the store.
    #[derive(Default, Clone)]
    struct InMemorySceneRepo {
        inner: Arc<RepoInner>,
    }

    #[derive(Default)]
    struct RepoInner {
        stored: Mutex<Vec<Scene>>,
        fail_persist: std::sync::atomic::AtomicBool,
    }

    impl InMemorySceneRepo {
        fn stored(&self) -> Vec<Scene> {
            self.inner.stored.lock().unwrap().clone()
        }

        fn fail_persist(&self, fail: bool) {
            self.inner
                .fail_persist
                .store(fail, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl SceneRepository for InMemorySceneRepo {
        async fn load(&self) -> Result<Vec<Scene>, PersistenceError> {
            Ok(self.stored())
        }

        async fn persist(&self, scenes: &[Scene]) -> Result<(), PersistenceError> {
            if self.inner.fail_persist.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(PersistenceError::InvalidFormat("disk full".to_string()));
            }
            *self.inner.stored.lock().unwrap() = scenes.to_vec();
            Ok(())
        }
    }

    async fn service_with(bulbs: &[FakeBulb]) -> SceneService<FakeBackend, InMemorySceneRepo> {
        let backend = FakeBackend::default();
        for bulb in bulbs {
            backend.add(bulb.clone());
        }
        let registry = Arc::new(LightRegistry::new(backend));
        registry.load_all().await.unwrap();
        SceneService::new(registry, InMemorySceneRepo::default())
    }

    fn request(name: &str, macs: &[&str]) -> SceneRequest {
        SceneRequest {
            id: String::new(),
            name: name.to_string(),
            description: String::new(),
            actions: macs.iter().map(ToString::to_string).collect(),
            order: 1,
        }
    }

    #[tokio::test]
    async fn should_reject_save_when_name_is_empty() {
        let svc = service_with(&[]).await;
        let result = svc.save(request("", &[])).await;
        assert!(matches!(result, Err(LumenError::Validation(_))));
        assert!(svc.list().await.is_empty());
        assert!(svc.repo.stored().is_empty());
    }

    #[tokio::test]
    async fn should_reject_save_when_any_address_is_unknown() {
        let bulb = FakeBulb::new("aa:01", "Desk", "Office");
        let svc = service_with(std::slice::from_ref(&bulb)).await;

        let result = svc.save(request("Evening", &["aa:01", "no:pe"])).await;

        assert!(matches!(result, Err(LumenError::NotFound(_))));
        assert!(svc.list().await.is_empty());
        assert!(svc.repo.stored().is_empty());
    }

    #[tokio::test]
    async fn should_capture_live_state_into_saved_scene() {
        let bulb = FakeBulb::new("aa:01", "Desk", "Office")
            .with_power(true)
            .with_color(Hsbk::new(10, 20, 30, 4000));
        let svc = service_with(std::slice::from_ref(&bulb)).await;

        let id = svc.save(request("Evening", &["aa:01"])).await.unwrap();

        let stored = svc.repo.stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(
            stored[0].actions,
            vec![SceneAction::capture("aa:01", true, Hsbk::new(10, 20, 30, 4000))]
        );
    }

    #[tokio::test]
    async fn should_capture_refreshed_values_when_bulb_changed_since_load() {
        let bulb = FakeBulb::new("aa:01", "Desk", "Office");
        let svc = service_with(std::slice::from_ref(&bulb)).await;
        // The bulb changed after the registry cached it.
        bulb.set_live(true, Hsbk::new(1, 2, 3, 2700));

        svc.save(request("Evening", &["aa:01"])).await.unwrap();

        let stored = svc.repo.stored();
        assert_eq!(
            stored[0].actions,
            vec![SceneAction::capture("aa:01", true, Hsbk::new(1, 2, 3, 2700))]
        );
    }

    #[tokio::test]
    async fn should_fall_back_to_cached_values_when_refresh_fails_during_save() {
        let bulb = FakeBulb::new("aa:01", "Desk", "Office").with_color(Hsbk::new(5, 5, 5, 5000));
        let svc = service_with(std::slice::from_ref(&bulb)).await;
        bulb.fail_state(true);

        svc.save(request("Evening", &["aa:01"])).await.unwrap();

        let stored = svc.repo.stored();
        assert_eq!(
            stored[0].actions,
            vec![SceneAction::capture("aa:01", false, Hsbk::new(5, 5, 5, 5000))]
        );
    }

    #[tokio::test]
    async fn should_ignore_empty_addresses_in_save_request() {
        let bulb = FakeBulb::new("aa:01", "Desk", "Office");
        let svc = service_with(std::slice::from_ref(&bulb)).await;

        svc.save(request("Evening", &["", "aa:01"])).await.unwrap();

        assert_eq!(svc.repo.stored()[0].actions.len(), 1);
    }

    #[tokio::test]
    async fn should_keep_in_memory_scene_when_persist_fails() {
        let svc = service_with(&[]).await;
        svc.repo.fail_persist(true);

        let result = svc.save(request("Evening", &[])).await;

        assert!(matches!(result, Err(LumenError::Persistence(_))));
        // Accepted limitation: memory and file diverge on a write failure.
        assert_eq!(svc.list().await.len(), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_when_modifying_unknown_scene() {
        let svc = service_with(&[]).await;
        let mut req = request("Evening", &[]);
        req.id = "missing".to_string();
        let result = svc.modify(req).await;
        assert!(matches!(result, Err(LumenError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_skip_unknown_addresses_when_modifying() {
        let bulb = FakeBulb::new("aa:01", "Desk", "Office").with_power(true);
        let svc = service_with(std::slice::from_ref(&bulb)).await;
        let id = svc.save(request("Evening", &["aa:01"])).await.unwrap();

        let mut req = request("Evening v2", &["aa:01", "no:pe"]);
        req.id = id.as_str().to_string();
        svc.modify(req).await.unwrap();

        let stored = svc.repo.stored();
        assert_eq!(stored[0].name, "Evening v2");
        let macs: Vec<_> = stored[0].actions.iter().map(|a| a.mac.as_str()).collect();
        assert_eq!(macs, vec!["aa:01"]);
    }

    #[tokio::test]
    async fn should_replace_metadata_and_rebuild_actions_when_modifying() {
        let bulb = FakeBulb::new("aa:01", "Desk", "Office");
        let svc = service_with(std::slice::from_ref(&bulb)).await;
        let id = svc.save(request("Evening", &["aa:01"])).await.unwrap();

        bulb.set_live(true, Hsbk::new(9, 9, 9, 9000));
        let mut req = request("Night", &["aa:01"]);
        req.description = "After dark".to_string();
        req.order = 7;
        req.id = id.as_str().to_string();
        svc.modify(req).await.unwrap();

        let stored = svc.repo.stored();
        assert_eq!(stored[0].name, "Night");
        assert_eq!(stored[0].description, "After dark");
        assert_eq!(stored[0].order, 7);
        assert_eq!(
            stored[0].actions,
            vec![SceneAction::capture("aa:01", true, Hsbk::new(9, 9, 9, 9000))]
        );
    }

    #[tokio::test]
    async fn should_remove_scene_and_persist_when_deleting_existing_id() {
        let svc = service_with(&[]).await;
        let id = svc.save(request("Evening", &[])).await.unwrap();
        svc.save(request("Morning", &[])).await.unwrap();

        svc.delete(&id).await.unwrap();

        let summaries = svc.list().await;
        assert_eq!(summaries.len(), 1);
        assert!(summaries.iter().all(|s| s.id != id));
        assert_eq!(svc.repo.stored().len(), 1);
    }

    #[tokio::test]
    async fn should_leave_collection_unchanged_when_deleting_unknown_id() {
        let svc = service_with(&[]).await;
        svc.save(request("Evening", &[])).await.unwrap();

        svc.delete(&SceneId::from_string("missing")).await.unwrap();

        assert_eq!(svc.list().await.len(), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_when_running_unknown_scene() {
        let svc = service_with(&[]).await;
        let result = svc.run(&SceneId::from_string("missing")).await;
        assert!(matches!(result, Err(LumenError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_apply_power_and_color_to_each_resolvable_action() {
        let bulb = FakeBulb::new("aa:01", "Desk", "Office")
            .with_power(true)
            .with_color(Hsbk::new(10, 20, 30, 4000));
        let svc = service_with(std::slice::from_ref(&bulb)).await;
        let id = svc.save(request("Evening", &["aa:01"])).await.unwrap();

        svc.run(&id).await.unwrap();

        assert_eq!(bulb.power_calls(), vec![true]);
        // Scene replay applies colors with an immediate transition.
        assert_eq!(bulb.color_calls(), vec![(Hsbk::new(10, 20, 30, 4000), 0)]);
    }

    #[tokio::test]
    async fn should_continue_past_unresolvable_action_when_running() {
        let bulb = FakeBulb::new("aa:02", "Shelf", "Office").with_power(true);
        let svc = service_with(std::slice::from_ref(&bulb)).await;

        // Build a scene whose first action points at a bulb that is gone.
        let id = {
            let mut scenes = svc.scenes.write().await;
            let scene = Scene {
                id: SceneId::generate(),
                name: "Mixed".to_string(),
                description: String::new(),
                actions: vec![
                    SceneAction::capture("gh:ost", true, Hsbk::default()),
                    SceneAction::capture("aa:02", true, Hsbk::new(1, 1, 1, 1000)),
                ],
                order: 0,
            };
            let id = scene.id.clone();
            scenes.push(scene);
            id
        };

        svc.run(&id).await.unwrap();

        assert_eq!(bulb.power_calls(), vec![true]);
        assert_eq!(bulb.color_calls(), vec![(Hsbk::new(1, 1, 1, 1000), 0)]);
    }

    #[tokio::test]
    async fn should_continue_past_rejected_commands_when_running() {
        let healthy = FakeBulb::new("aa:01", "Desk", "Office");
        let broken = FakeBulb::new("aa:02", "Shelf", "Office");
        let svc = service_with(&[broken.clone(), healthy.clone()]).await;
        let id = svc.save(request("Evening", &["aa:02", "aa:01"])).await.unwrap();
        broken.fail_commands(true);

        svc.run(&id).await.unwrap();

        assert!(broken.power_calls().is_empty());
        assert_eq!(healthy.power_calls(), vec![false]);
        assert_eq!(healthy.color_calls().len(), 1);
    }

    #[tokio::test]
    async fn should_round_trip_collection_through_repository_load() {
        let svc = service_with(&[]).await;
        let id = svc.save(request("Evening", &[])).await.unwrap();

        // A second service over the same repository sees the saved scene.
        let registry = Arc::new(LightRegistry::new(FakeBackend::default()));
        let reloaded = SceneService::new(registry, svc.repo.clone());
        reloaded.load().await.unwrap();

        let summaries = reloaded.list().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, id);
        assert_eq!(summaries[0].name, "Evening");
    }
}
