//! JSON REST API handlers.

pub mod lights;
pub mod scenes;

use axum::Router;
use axum::routing::{get, post};

use lumen_app::ports::{LightBackend, SceneRepository};

use crate::state::AppState;

/// Assemble the `/api` routes.
pub fn routes<B, R>() -> Router<AppState<B, R>>
where
    B: LightBackend,
    R: SceneRepository,
{
    Router::new()
        .route("/lights", get(lights::list))
        .route("/lights/power", post(lights::set_all_power))
        .route("/lights/{mac}/power", post(lights::set_power))
        .route("/lights/{mac}/refresh", post(lights::refresh))
        .route("/scenes", get(scenes::list).post(scenes::create))
        .route(
            "/scenes/{id}",
            axum::routing::put(scenes::modify).delete(scenes::delete),
        )
        .route("/scenes/{id}/run", post(scenes::run))
}
