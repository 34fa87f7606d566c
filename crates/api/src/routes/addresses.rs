//! Address handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use client_directory_core::AddressId;

use crate::error::AppError;
use crate::middleware::IdPath;
use crate::models::{Address, AddressDetail, CreateAddressInput, UpdateAddressInput};
use crate::services::AddressService;
use crate::state::AppState;

/// Build the addresses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addresses", get(list).post(create))
        .route("/addresses/{id}", get(show).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateAddressInput>,
) -> Result<(StatusCode, Json<Address>), AppError> {
    let created = AddressService::new(state.store()).create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Address>>, AppError> {
    Ok(Json(AddressService::new(state.store()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath<AddressId>,
) -> Result<Json<AddressDetail>, AppError> {
    Ok(Json(AddressService::new(state.store()).find_one(id).await?))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<AddressId>,
    Json(input): Json<UpdateAddressInput>,
) -> Result<Json<Address>, AppError> {
    Ok(Json(AddressService::new(state.store()).update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    IdPath(id): IdPath<AddressId>,
) -> Result<Json<Address>, AppError> {
    Ok(Json(AddressService::new(state.store()).remove(id).await?))
}
