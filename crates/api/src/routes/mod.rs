//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness (store ping)
//!
//! POST   /states               - Create a state
//! GET    /states               - List states
//! GET    /states/{id}          - State with its cities
//! PATCH  /states/{id}          - Rename a state
//! DELETE /states/{id}          - Delete a state
//!
//! POST   /cities               - Create a city in a state
//! GET    /cities               - List cities
//! GET    /cities/{id}          - City with its locations
//! PATCH  /cities/{id}          - Rename or move a city
//! DELETE /cities/{id}          - Delete a city
//!
//! POST   /locations            - Create a location in a city
//! GET    /locations            - List locations
//! GET    /locations/{id}       - Location with its city
//! PATCH  /locations/{id}       - Rename or move a location
//! DELETE /locations/{id}       - Delete a location
//!
//! POST   /clients              - Create a client
//! GET    /clients              - List clients
//! GET    /clients/{id}         - Client with placed addresses
//! PATCH  /clients/{id}         - Update a client
//! DELETE /clients/{id}         - Delete a client
//!
//! POST   /addresses            - Create an address
//! GET    /addresses            - List addresses
//! GET    /addresses/{id}       - Address with client and placement
//! PATCH  /addresses/{id}       - Update an address
//! DELETE /addresses/{id}       - Delete an address
//! ```
//!
//! Creates answer `201 Created`; everything else answers `200 OK` with the
//! affected row. Errors use the JSON body from [`AppError`](crate::error::AppError).

pub mod addresses;
pub mod cities;
pub mod clients;
pub mod health;
pub mod locations;
pub mod states;

use axum::Router;

use crate::state::AppState;

/// Build the resource router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(states::router())
        .merge(cities::router())
        .merge(locations::router())
        .merge(clients::router())
        .merge(addresses::router())
}
