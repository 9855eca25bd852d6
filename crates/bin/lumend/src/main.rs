//! # lumend — lumen daemon
//!
//! Composition root that wires the adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Construct the light backend and the scene repository (adapters)
//! - Construct application services, injecting adapters via port traits
//! - Run the initial discovery and load the persisted scenes
//! - Spawn the periodic refresh scheduler
//! - Build the axum router, bind to a TCP port, and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use lumen_adapter_http_axum::router;
use lumen_adapter_http_axum::state::AppState;
use lumen_adapter_storage_yaml::YamlSceneRepository;
use lumen_adapter_virtual::VirtualBackend;
use lumen_app::scheduler::RefreshScheduler;
use lumen_app::services::light_service::LightService;
use lumen_app::services::registry::LightRegistry;
use lumen_app::services::scene_service::SceneService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Backend + registry
    let backend = VirtualBackend::demo(config.backend.virtual_bulbs);
    let registry = Arc::new(LightRegistry::new(backend));
    if let Err(err) = registry.load_all().await {
        // An unreachable bulb at boot is not fatal; the scheduler retries.
        tracing::warn!(error = %err, "error loading one or more lights");
    }

    // Services
    let light_service = Arc::new(LightService::new(
        Arc::clone(&registry),
        config.fanout_policy(),
    ));
    let scene_service = Arc::new(SceneService::new(
        Arc::clone(&registry),
        YamlSceneRepository::new(&config.storage.directory),
    ));
    scene_service.load().await?;

    // Background refresh
    let scheduler = RefreshScheduler::spawn(Arc::clone(&registry), config.refresh_interval());

    // HTTP
    let app = router::build(AppState::new(registry, light_service, scene_service));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "lumend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
