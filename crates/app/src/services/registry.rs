//! Light registry — the authoritative in-memory cache of known bulbs.
//!
//! Locking discipline: the collection lock (`RwLock<Vec<…>>`) is held only
//! around append and scan, never across a backend call. Each light carries
//! its own async guard over the mutable cached fields; read-modify-write
//! sequences hold that guard for the backend call plus the cache update, so
//! a reconcile and a user-triggered mutation on the same bulb serialize.
//! Never hold two lights' guards at once.

use std::sync::{Arc, RwLock};

use lumen_domain::error::{LumenError, NotFoundError};
use lumen_domain::light::{LightSnapshot, LightState};

use crate::ports::{GroupReading, LightBackend, LightHandle};

/// One known bulb: immutable identity, its backend handle, and the guarded
/// cached state.
pub struct Light<H> {
    address: String,
    handle: H,
    state: tokio::sync::Mutex<LightState>,
}

impl<H: LightHandle> Light<H> {
    fn new(handle: H, state: LightState) -> Self {
        Self {
            address: handle.address().to_string(),
            handle,
            state: tokio::sync::Mutex::new(state),
        }
    }

    /// The bulb's stable hardware address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The backend control handle.
    pub(crate) fn handle(&self) -> &H {
        &self.handle
    }

    /// Lock the cached state for a read-modify-write sequence.
    pub(crate) async fn guard(&self) -> tokio::sync::MutexGuard<'_, LightState> {
        self.state.lock().await
    }

    /// Snapshot the cached state.
    pub async fn snapshot(&self) -> LightSnapshot {
        let state = self.state.lock().await;
        LightSnapshot::project(&self.address, &state)
    }
}

/// In-memory registry of every bulb seen since startup.
///
/// Bulbs are appended on discovery and never removed; a bulb missing from a
/// scan keeps its last-observed state until it reappears.
pub struct LightRegistry<B: LightBackend> {
    backend: B,
    lights: RwLock<Vec<Arc<Light<B::Handle>>>>,
}

impl<B: LightBackend> LightRegistry<B> {
    /// Create an empty registry over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            lights: RwLock::new(Vec::new()),
        }
    }

    /// Initial discovery: scan once and register every bulb that answers.
    ///
    /// Bulbs are appended as their state arrives, so an error part-way
    /// through leaves the bulbs registered so far in place.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Capability`] if the scan itself or any single
    /// bulb's state/group fetch fails. Known fragility: one unreachable
    /// bulb fails the whole call; the periodic reconcile picks up whatever
    /// was missed.
    #[tracing::instrument(skip(self))]
    pub async fn load_all(&self) -> Result<(), LumenError> {
        let handles = self.backend.discover().await?;
        for handle in handles {
            let reading = handle.color_state().await?;
            let group = handle.group().await?;
            tracing::info!(
                mac = %handle.address(),
                name = %reading.label,
                group = %group.label,
                "found light"
            );
            self.append(Light::new(
                handle,
                LightState {
                    name: reading.label,
                    power: reading.power,
                    color: reading.color,
                    group: group.label,
                },
            ));
        }
        Ok(())
    }

    /// Re-scan and merge observed state into the registry.
    ///
    /// Per bulb: a failed state fetch skips that bulb for this cycle only; a
    /// failed group fetch leaves the cached group alone. Known bulbs get
    /// their group/color/power updated (under their guard) when the
    /// observation differs, each change logged. Unknown bulbs are appended.
    /// Bulbs absent from the scan are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Capability`] only when the scan itself fails.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<(), LumenError> {
        tracing::debug!("refreshing lights");
        let handles = self.backend.discover().await?;
        for handle in handles {
            let reading = match handle.color_state().await {
                Ok(reading) => reading,
                Err(err) => {
                    tracing::warn!(
                        mac = %handle.address(),
                        error = %err,
                        "error getting bulb state, skipping update"
                    );
                    continue;
                }
            };
            let group = handle.group().await;
            if let Err(err) = &group {
                tracing::warn!(mac = %handle.address(), error = %err, "error getting bulb group");
            }

            if let Some(light) = self.lookup(handle.address()) {
                let mut state = light.guard().await;
                if let Ok(GroupReading { label }) = group
                    && state.group != label
                {
                    tracing::info!(name = %state.name, group = %label, "light has new group");
                    state.group = label;
                }
                if state.color != reading.color {
                    tracing::info!(name = %state.name, colour = %reading.color, "light has new colour");
                    state.color = reading.color;
                }
                if state.power != reading.power {
                    tracing::info!(name = %state.name, power = reading.power, "light has new power state");
                    state.power = reading.power;
                }
            } else {
                tracing::info!(mac = %handle.address(), name = %reading.label, "found new light");
                self.append(Light::new(
                    handle,
                    LightState {
                        name: reading.label,
                        power: reading.power,
                        color: reading.color,
                        group: group.map(|g| g.label).unwrap_or_default(),
                    },
                ));
            }
        }
        Ok(())
    }

    /// Look up a bulb by address.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no bulb with `mac` is registered.
    pub fn find(&self, mac: &str) -> Result<Arc<Light<B::Handle>>, NotFoundError> {
        self.lookup(mac).ok_or_else(|| NotFoundError::light(mac))
    }

    /// Re-fetch one bulb's live state and fold it into the cache.
    ///
    /// Used before snapshotting into a scene action so scenes capture live,
    /// not stale, values.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] for an unknown address and
    /// [`LumenError::Capability`] when the state fetch fails (cache is left
    /// unchanged).
    #[tracing::instrument(skip(self))]
    pub async fn refresh_one(&self, mac: &str) -> Result<(), LumenError> {
        let light = self.find(mac)?;
        let mut state = light.guard().await;
        let reading = light.handle().color_state().await?;
        if state.color != reading.color {
            tracing::info!(name = %state.name, colour = %reading.color, "light has new colour");
            state.color = reading.color;
        }
        if state.power != reading.power {
            tracing::info!(name = %state.name, power = reading.power, "light has new power state");
            state.power = reading.power;
        }
        Ok(())
    }

    /// Snapshot every registered bulb, in registry order.
    pub async fn snapshots(&self) -> Vec<LightSnapshot> {
        let lights = self.scan();
        let mut list = Vec::with_capacity(lights.len());
        for light in lights {
            list.push(light.snapshot().await);
        }
        list
    }

    /// The backend this registry discovers through.
    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    /// All registered bulbs, in registry order.
    pub(crate) fn scan(&self) -> Vec<Arc<Light<B::Handle>>> {
        self.lights
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn lookup(&self, mac: &str) -> Option<Arc<Light<B::Handle>>> {
        self.lights
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .find(|light| light.address() == mac)
            .cloned()
    }

    fn append(&self, light: Light<B::Handle>) {
        self.lights
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(Arc::new(light));
    }
}
