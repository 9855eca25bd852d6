//! JSON REST handlers for scenes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lumen_app::ports::{LightBackend, SceneRepository};
use lumen_domain::id::SceneId;
use lumen_domain::scene::{SceneRequest, SceneSummary};

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned after creating a scene.
#[derive(Serialize)]
pub struct CreatedBody {
    pub id: SceneId,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<SceneSummary>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<CreatedBody>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the modify/run endpoints.
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

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/scenes`
pub async fn list<B, R>(State(state): State<AppState<B, R>>) -> Result<ListResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    Ok(ListResponse::Ok(Json(state.scene_service.list().await)))
}

/// `POST /api/scenes`
pub async fn create<B, R>(
    State(state): State<AppState<B, R>>,
    Json(req): Json<SceneRequest>,
) -> Result<CreateResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    let id = state.scene_service.save(req).await?;
    Ok(CreateResponse::Created(Json(CreatedBody { id })))
}

/// `PUT /api/scenes/{id}`
///
/// The path id is authoritative; any id in the body is ignored.
pub async fn modify<B, R>(
    State(state): State<AppState<B, R>>,
    Path(id): Path<String>,
    Json(mut req): Json<SceneRequest>,
) -> Result<StatusResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    req.id = id;
    state.scene_service.modify(req).await?;
    Ok(StatusResponse::Ok)
}

/// `DELETE /api/scenes/{id}`
pub async fn delete<B, R>(
    State(state): State<AppState<B, R>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    state.scene_service.delete(&SceneId::from_string(id)).await?;
    Ok(DeleteResponse::NoContent)
}

/// `POST /api/scenes/{id}/run`
pub async fn run<B, R>(
    State(state): State<AppState<B, R>>,
    Path(id): Path<String>,
) -> Result<StatusResponse, ApiError>
where
    B: LightBackend,
    R: SceneRepository,
{
    state.scene_service.run(&SceneId::from_string(id)).await?;
    Ok(StatusResponse::Ok)
}
