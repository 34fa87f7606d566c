//! Client handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use client_directory_core::ClientId;

use crate::error::AppError;
use crate::middleware::IdPath;
use crate::models::{Client, ClientWithAddresses, CreateClientInput, UpdateClientInput};
use crate::services::ClientService;
use crate::state::AppState;

/// Build the clients router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list).post(create))
        .route("/clients/{id}", get(show).patch(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateClientInput>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let created = ClientService::new(state.store()).create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Client>>, AppError> {
    Ok(Json(ClientService::new(state.store()).find_all().await?))
}

async fn show(
    State(state): State<AppState>,
    IdPath(id): IdPath<ClientId>,
) -> Result<Json<ClientWithAddresses>, AppError> {
    Ok(Json(ClientService::new(state.store()).find_one(id).await?))
}

async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath<ClientId>,
    Json(input): Json<UpdateClientInput>,
) -> Result<Json<Client>, AppError> {
    Ok(Json(ClientService::new(state.store()).update(id, input).await?))
}

async fn remove(
    State(state): State<AppState>,
    IdPath(id): IdPath<ClientId>,
) -> Result<Json<Client>, AppError> {
    Ok(Json(ClientService::new(state.store()).remove(id).await?))
}
