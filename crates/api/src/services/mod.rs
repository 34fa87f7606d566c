//! Business logic for the directory.
//!
//! Each service borrows a [`Store`](crate::db::Store) and layers the
//! directory rules on top of it: existence checks for ids and parents,
//! blank-field validation, and the accent- and case-insensitive duplicate
//! name checks for states, cities and locations.
//!
//! # Services
//!
//! - `states` - [`StateService`]
//! - `cities` - [`CityService`], names unique per state
//! - `locations` - [`LocationService`], names unique per city
//! - `clients` - [`ClientService`]
//! - `addresses` - [`AddressService`]

pub mod addresses;
pub mod cities;
pub mod clients;
pub mod locations;
pub mod states;

use thiserror::Error;

use client_directory_core::EntityName;

use crate::db::RepositoryError;

pub use addresses::AddressService;
pub use cities::CityService;
pub use clients::ClientService;
pub use locations::LocationService;
pub use states::StateService;

/// Errors raised by the directory services.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No row with this id.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    /// Another row in the same scope already has an equivalent name.
    #[error("{entity} \"{name}\" already exists")]
    AlreadyExists { entity: &'static str, name: String },

    /// The request was well-formed but a value is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl DirectoryError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<i32>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub(crate) fn already_exists(entity: &'static str, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            name: name.into(),
        }
    }
}

/// Map a store error from a write on a named row.
///
/// A unique-index violation means a concurrent writer got there first.
pub(crate) fn on_named_write<'a>(
    entity: &'static str,
    name: &'a str,
) -> impl FnOnce(RepositoryError) -> DirectoryError + 'a {
    move |err| match err {
        RepositoryError::Conflict(_) => DirectoryError::already_exists(entity, name),
        other => other.into(),
    }
}

/// Map a store error for a row that was known to exist a moment ago.
pub(crate) fn on_existing(
    entity: &'static str,
    id: i32,
) -> impl FnOnce(RepositoryError) -> DirectoryError {
    move |err| match err {
        RepositoryError::NotFound => DirectoryError::not_found(entity, id),
        other => other.into(),
    }
}

/// Reject empty or whitespace-only text.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), DirectoryError> {
    if value.trim().is_empty() {
        return Err(DirectoryError::InvalidInput(format!(
            "{field} must not be blank"
        )));
    }
    Ok(())
}

/// Validate a state, city or location name and compute its key.
pub(crate) fn require_name(value: String) -> Result<EntityName, DirectoryError> {
    require_text("name", &value)?;
    Ok(EntityName::new(value))
}
