//! Persistence for the directory.
//!
//! # Tables
//!
//! - `states` - unique `name_key`
//! - `cities` - unique `(state_id, name_key)`, FK to `states`
//! - `locations` - unique `(city_id, name_key)`, FK to `cities`
//! - `clients`
//! - `addresses` - FKs to `clients` and `locations`
//!
//! Every foreign key is `ON DELETE RESTRICT`: removing a row that still has
//! dependents fails with [`RepositoryError::Conflict`]. `name_key` holds the
//! normalized form of `name` and backs the duplicate-name checks.
//!
//! # Backends
//!
//! Services talk to a [`Store`]. [`PgStore`] is the production backend;
//! [`MemoryStore`] keeps everything in process and enforces the same unique
//! keys and foreign keys, for local development and tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p client-directory-cli -- migrate
//! ```

pub mod addresses;
pub mod cities;
pub mod clients;
pub mod locations;
pub mod memory;
pub mod states;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use client_directory_core::{AddressId, CityId, ClientId, LocationId, StateId};

use crate::config::{DirectoryConfig, StoreBackend};
use crate::models::{
    Address, AddressWithLocation, City, CityChanges, Client, CreateAddressInput,
    CreateClientInput, Location, LocationChanges, LocationPlacement, NewCity, NewLocation,
    NewState, State, StateChanges, UpdateAddressInput, UpdateClientInput,
};

pub use memory::MemoryStore;

/// Errors from opening the configured store.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("postgres store selected but no database is configured")]
    MissingDatabase,

    #[error("failed to create database pool: {0}")]
    Pool(#[from] sqlx::Error),
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (unique name key or a restricted delete).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

// =============================================================================
// Store Traits
// =============================================================================

/// State persistence.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn state_by_id(&self, id: StateId) -> Result<Option<State>, RepositoryError>;
    async fn list_states(&self) -> Result<Vec<State>, RepositoryError>;
    /// Find the state whose normalized name equals `key`.
    async fn state_by_name_key(&self, key: &str) -> Result<Option<State>, RepositoryError>;
    async fn insert_state(&self, new: &NewState) -> Result<State, RepositoryError>;
    /// Returns `RepositoryError::NotFound` if the state does not exist.
    async fn update_state(
        &self,
        id: StateId,
        changes: &StateChanges,
    ) -> Result<State, RepositoryError>;
    /// Returns `RepositoryError::NotFound` if the state does not exist and
    /// `RepositoryError::Conflict` if cities still reference it.
    async fn delete_state(&self, id: StateId) -> Result<State, RepositoryError>;
}

/// City persistence.
#[async_trait]
pub trait CityStore: Send + Sync {
    async fn city_by_id(&self, id: CityId) -> Result<Option<City>, RepositoryError>;
    async fn list_cities(&self) -> Result<Vec<City>, RepositoryError>;
    async fn cities_in_state(&self, state_id: StateId) -> Result<Vec<City>, RepositoryError>;
    /// Find the city in `state_id` whose normalized name equals `key`.
    async fn city_by_name_key(
        &self,
        state_id: StateId,
        key: &str,
    ) -> Result<Option<City>, RepositoryError>;
    async fn insert_city(&self, new: &NewCity) -> Result<City, RepositoryError>;
    async fn update_city(&self, id: CityId, changes: &CityChanges)
    -> Result<City, RepositoryError>;
    async fn delete_city(&self, id: CityId) -> Result<City, RepositoryError>;
}

/// Location persistence.
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn location_by_id(&self, id: LocationId) -> Result<Option<Location>, RepositoryError>;
    async fn list_locations(&self) -> Result<Vec<Location>, RepositoryError>;
    async fn locations_in_city(&self, city_id: CityId) -> Result<Vec<Location>, RepositoryError>;
    /// Find the location in `city_id` whose normalized name equals `key`.
    async fn location_by_name_key(
        &self,
        city_id: CityId,
        key: &str,
    ) -> Result<Option<Location>, RepositoryError>;
    /// Load a location together with its city and state.
    async fn location_placement(
        &self,
        id: LocationId,
    ) -> Result<Option<LocationPlacement>, RepositoryError>;
    async fn insert_location(&self, new: &NewLocation) -> Result<Location, RepositoryError>;
    async fn update_location(
        &self,
        id: LocationId,
        changes: &LocationChanges,
    ) -> Result<Location, RepositoryError>;
    async fn delete_location(&self, id: LocationId) -> Result<Location, RepositoryError>;
}

/// Client persistence.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn client_by_id(&self, id: ClientId) -> Result<Option<Client>, RepositoryError>;
    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError>;
    async fn insert_client(&self, input: &CreateClientInput) -> Result<Client, RepositoryError>;
    async fn update_client(
        &self,
        id: ClientId,
        input: &UpdateClientInput,
    ) -> Result<Client, RepositoryError>;
    async fn delete_client(&self, id: ClientId) -> Result<Client, RepositoryError>;
}

/// Address persistence.
#[async_trait]
pub trait AddressStore: Send + Sync {
    async fn address_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError>;
    async fn list_addresses(&self) -> Result<Vec<Address>, RepositoryError>;
    /// All addresses of a client, each with its location, city and state.
    async fn addresses_of_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<AddressWithLocation>, RepositoryError>;
    async fn insert_address(&self, input: &CreateAddressInput)
    -> Result<Address, RepositoryError>;
    async fn update_address(
        &self,
        id: AddressId,
        input: &UpdateAddressInput,
    ) -> Result<Address, RepositoryError>;
    async fn delete_address(&self, id: AddressId) -> Result<Address, RepositoryError>;
}

/// Everything the services need from a backend.
#[async_trait]
pub trait Store: StateStore + CityStore + LocationStore + ClientStore + AddressStore {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

// =============================================================================
// PostgreSQL
// =============================================================================

/// `PostgreSQL`-backed [`Store`].
///
/// The per-entity trait impls live in the sibling modules.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Open the store selected by `config`.
///
/// # Errors
///
/// Returns `OpenError::MissingDatabase` if the postgres backend is selected
/// without database settings, and `OpenError::Pool` if the pool cannot be
/// created.
pub async fn open(config: &DirectoryConfig) -> Result<Arc<dyn Store>, OpenError> {
    match (config.store, &config.database) {
        (StoreBackend::Postgres, Some(database)) => {
            let pool = create_pool(&database.url, database.max_connections).await?;
            tracing::info!(max_connections = database.max_connections, "Database pool created");
            Ok(Arc::new(PgStore::new(pool)))
        }
        (StoreBackend::Postgres, None) => Err(OpenError::MissingDatabase),
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

// =============================================================================
// Constraint Mapping
// =============================================================================

/// Human-readable message for the unique indexes declared in the migrations.
fn unique_message(constraint: &str) -> Option<&'static str> {
    match constraint {
        "states_name_key_idx" => Some("a state with that name already exists"),
        "cities_state_name_key_idx" => Some("a city with that name already exists in the state"),
        "locations_city_name_key_idx" => {
            Some("a location with that name already exists in the city")
        }
        _ => None,
    }
}

/// Map an error from an `INSERT` or `UPDATE`.
///
/// Unique-index violations become `Conflict`; a foreign key violation means
/// the referenced parent disappeared between the pre-check and the write and
/// becomes `NotFound`.
pub(crate) fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let message = db_err
                .constraint()
                .and_then(unique_message)
                .unwrap_or("duplicate value");
            return RepositoryError::Conflict(message.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(err)
}

/// Map an error from a `DELETE`: a foreign key violation means dependents
/// still reference the row.
pub(crate) fn map_delete_error(err: sqlx::Error, dependents: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_foreign_key_violation()
    {
        return restricted(dependents);
    }
    RepositoryError::Database(err)
}

/// The error reported when a delete is blocked by dependent rows.
fn restricted(dependents: &str) -> RepositoryError {
    RepositoryError::Conflict(format!("{dependents} still reference this row"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn memory_config() -> DirectoryConfig {
        let lookup = |key: &str| (key == "DIRECTORY_STORE").then(|| "memory".to_string());
        DirectoryConfig::from_source(lookup).unwrap()
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open(&memory_config()).await.unwrap();
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_open_postgres_without_database_fails() {
        let config = DirectoryConfig {
            store: StoreBackend::Postgres,
            ..memory_config()
        };
        assert!(matches!(open(&config).await, Err(OpenError::MissingDatabase)));
    }

    #[test]
    fn test_unique_message_known_indexes() {
        assert!(unique_message("states_name_key_idx").is_some());
        assert!(unique_message("cities_state_name_key_idx").is_some());
        assert!(unique_message("locations_city_name_key_idx").is_some());
        assert!(unique_message("something_else").is_none());
    }

    #[test]
    fn test_map_errors_pass_through_non_database_errors() {
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            RepositoryError::Database(_)
        ));
        assert!(matches!(
            map_delete_error(sqlx::Error::PoolTimedOut, "cities"),
            RepositoryError::Database(_)
        ));
    }
}
