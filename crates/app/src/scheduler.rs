//! Refresh scheduler — a cancelable periodic reconcile loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ports::LightBackend;
use crate::services::registry::LightRegistry;

/// Drives [`LightRegistry::reconcile`] on a fixed interval from a background
/// task. Reconcile errors are logged and the loop keeps ticking; only
/// [`stop`](Self::stop) ends it.
pub struct RefreshScheduler {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the reconcile loop. The first reconcile runs one `interval`
    /// after the call, not immediately — startup does its own initial load.
    pub fn spawn<B: LightBackend>(registry: Arc<LightRegistry<B>>, interval: Duration) -> Self {
        let (shutdown, mut stopped) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // interval() fires immediately once; swallow that tick.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = registry.reconcile().await {
                            tracing::warn!(error = %err, "scheduled refresh failed");
                        }
                    }
                    _ = stopped.changed() => {
                        tracing::debug!("refresh scheduler stopping");
                        return;
                    }
                }
            }
        });
        Self { shutdown, task }
    }

    /// Signal the loop to stop and wait for the task to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
