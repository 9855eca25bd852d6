//! JSON REST handlers for lights.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use lumen_app::ports::{LightBackend, SceneRepository};
use lumen_domain::light::LightSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for the power endpoints.
#[derive(Deserialize)]
pub struct PowerRequest {
    pub on: bool,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<LightSnapshot>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the mutation endpoints.
pub enum StatusResponse {
    Ok,
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => Json("OK").into_response(),
        }
    }
}

/// `GET /api/lights`
pub async fn list<B, R>(State(state): State<AppState<B, R>>) -> Result<ListResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    Ok(ListResponse::Ok(Json(state.registry.snapshots().await)))
}

/// `POST /api/lights/{mac}/refresh`
pub async fn refresh<B, R>(
    State(state): State<AppState<B, R>>,
    Path(mac): Path<String>,
) -> Result<StatusResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    state.registry.refresh_one(&mac).await?;
    Ok(StatusResponse::Ok)
}

/// `POST /api/lights/{mac}/power`
pub async fn set_power<B, R>(
    State(state): State<AppState<B, R>>,
    Path(mac): Path<String>,
    Json(req): Json<PowerRequest>,
) -> Result<StatusResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    state.light_service.set_power(&mac, req.on).await?;
    Ok(StatusResponse::Ok)
}

/// `POST /api/lights/power`
///
/// Best-effort bulk switch; per-bulb failures are logged by the service and
/// never surface here.
pub async fn set_all_power<B, R>(
    State(state): State<AppState<B, R>>,
    Json(req): Json<PowerRequest>,
) -> Result<StatusResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    state.light_service.set_all_power(req.on).await;
    Ok(StatusResponse::Ok)
}
