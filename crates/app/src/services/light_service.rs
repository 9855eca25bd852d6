//! Light control — validated mutation of bulbs through the registry.

use std::sync::Arc;
use std::time::Duration;

use lumen_domain::color::Hsbk;
use lumen_domain::error::LumenError;

use crate::ports::{LightBackend, LightHandle};
use crate::services::registry::LightRegistry;

/// Pause between dispatching per-bulb tasks in [`LightService::set_all_power`].
/// A rate limit against the bulb network segment, not a correctness mechanism.
const FANOUT_PACING: Duration = Duration::from_millis(50);

/// Whether bulk power fan-out waits for every bulb or returns after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FanoutPolicy {
    /// Return once all tasks are dispatched (fire-and-forget).
    #[default]
    Detach,
    /// Join every per-bulb task before returning.
    Wait,
}

/// Per-bulb mutation operations.
///
/// Every operation resolves the bulb through the registry and holds its
/// guard across the backend call plus the cache update, so concurrent
/// reconciles and user mutations on the same bulb serialize. The cache is
/// updated optimistically on confirmed success; the periodic reconcile
/// corrects any drift.
pub struct LightService<B: LightBackend> {
    registry: Arc<LightRegistry<B>>,
    fanout: FanoutPolicy,
}

impl<B: LightBackend> LightService<B> {
    /// Create a control service over the shared registry.
    pub fn new(registry: Arc<LightRegistry<B>>, fanout: FanoutPolicy) -> Self {
        Self { registry, fanout }
    }

    /// Switch one bulb on or off.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] for an unknown address, or
    /// [`LumenError::Capability`] when the bulb rejects the command — the
    /// cached power state is left unchanged in that case.
    #[tracing::instrument(skip(self))]
    pub async fn set_power(&self, mac: &str, on: bool) -> Result<(), LumenError> {
        let light = self.registry.find(mac)?;
        let mut state = light.guard().await;
        light.handle().set_power(on).await?;
        state.power = on;
        tracing::info!(name = %state.name, power = on, "set power state");
        Ok(())
    }

    /// Apply a color to one bulb, transitioning over `duration_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] for an unknown address, or
    /// [`LumenError::Capability`] when the bulb rejects the command — the
    /// cached color is left unchanged in that case.
    #[tracing::instrument(skip(self))]
    pub async fn set_color(
        &self,
        mac: &str,
        color: Hsbk,
        duration_ms: u32,
    ) -> Result<(), LumenError> {
        let light = self.registry.find(mac)?;
        let mut state = light.guard().await;
        light.handle().set_color(color, duration_ms).await?;
        state.color = color;
        tracing::info!(name = %state.name, colour = %color, "set colour");
        Ok(())
    }

    /// Switch every registered bulb on or off.
    ///
    /// One task per bulb, each serialized only by its own guard, with a
    /// pacing delay between dispatches. Individual failures are logged and
    /// never abort the rest. Depending on the configured [`FanoutPolicy`]
    /// the call either returns after the last dispatch or joins every task.
    pub async fn set_all_power(&self, on: bool) {
        let lights = self.registry.scan();
        let mut tasks = Vec::with_capacity(lights.len());
        for light in lights {
            tasks.push(tokio::spawn(async move {
                let mut state = light.guard().await;
                match light.handle().set_power(on).await {
                    Ok(()) => {
                        state.power = on;
                        tracing::info!(name = %state.name, power = on, "set power state");
                    }
                    Err(err) => {
                        tracing::warn!(name = %state.name, power = on, error = %err, "error setting power state");
                    }
                }
            }));
            tokio::time::sleep(FANOUT_PACING).await;
        }
        if self.fanout == FanoutPolicy::Wait {
            for task in tasks {
                let _ = task.await;
            }
        }
    }
}
