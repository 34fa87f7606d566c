//! City handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use client_directory_core::CityId;

use crate::error::AppError;
use crate::middleware::IdPath;
use crate::models::{City, CityWithLocations, CreateCityInput, UpdateCityInput};
use crate::services::CityService;
use crate::state::AppState;

/// Build the cities router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cities", get(list).post(create))
        .route("/cities/{id}", get(show).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCityInput>,
) -> Result<(StatusCode, Json<City>), AppError> {
    let created = CityService::new(state.store()).create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<City>>, AppError> {
    Ok(Json(CityService::new(state.store()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath<CityId>,
) -> Result<Json<CityWithLocations>, AppError> {
    Ok(Json(CityService::new(state.store()).find_one(id).await?))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<CityId>,
    Json(input): Json<UpdateCityInput>,
) -> Result<Json<City>, AppError> {
    Ok(Json(CityService::new(state.store()).update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    IdPath(id): IdPath<CityId>,
) -> Result<Json<City>, AppError> {
    Ok(Json(CityService::new(state.store()).remove(id).await?))
}
