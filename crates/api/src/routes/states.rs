//! State handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use client_directory_core::StateId;

use crate::error::AppError;
use crate::middleware::IdPath;
use crate::models::{self, CreateStateInput, StateWithCities, UpdateStateInput};
use crate::services::StateService;
use crate::state::AppState;

/// Build the states router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/states", get(list).post(create))
        .route("/states/{id}", get(show).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStateInput>,
) -> Result<(StatusCode, Json<models::State>), AppError> {
    let created = StateService::new(state.store()).create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<models::State>>, AppError> {
    Ok(Json(StateService::new(state.store()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath<StateId>,
) -> Result<Json<StateWithCities>, AppError> {
    Ok(Json(StateService::new(state.store()).find_one(id).await?))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<StateId>,
    Json(input): Json<UpdateStateInput>,
) -> Result<Json<models::State>, AppError> {
    Ok(Json(StateService::new(state.store()).update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    IdPath(id): IdPath<StateId>,
) -> Result<Json<models::State>, AppError> {
    Ok(Json(StateService::new(state.store()).remove(id).await?))
}
