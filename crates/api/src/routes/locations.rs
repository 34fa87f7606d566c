//! Location handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use client_directory_core::LocationId;

use crate::error::AppError;
use crate::middleware::IdPath;
use crate::models::{Location, LocationWithCity, CreateLocationInput, UpdateLocationInput};
use crate::services::LocationService;
use crate::state::AppState;

/// Build the locations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list).post(create))
        .route("/locations/{id}", get(show).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateLocationInput>,
) -> Result<(StatusCode, Json<Location>), AppError> {
    let created = LocationService::new(state.store()).create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Location>>, AppError> {
    Ok(Json(LocationService::new(state.store()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath<LocationId>,
) -> Result<Json<LocationWithCity>, AppError> {
    Ok(Json(LocationService::new(state.store()).find_one(id).await?))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<LocationId>,
    Json(input): Json<UpdateLocationInput>,
) -> Result<Json<Location>, AppError> {
    Ok(Json(LocationService::new(state.store()).update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    IdPath(id): IdPath<LocationId>,
) -> Result<Json<Location>, AppError> {
    Ok(Json(LocationService::new(state.store()).remove(id).await?))
}
