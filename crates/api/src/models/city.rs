//! City (belongs to a state).

use serde::{Deserialize, Serialize};

use client_directory_core::{CityId, EntityName, StateId};

use super::location::Location;
use super::state::State;

/// A city. Its name is unique within its state after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub state_id: StateId,
}

/// A city with its locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityWithLocations {
    #[serde(flatten)]
    pub city: City,
    pub locations: Vec<Location>,
}

/// A city with the state it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityWithState {
    #[serde(flatten)]
    pub city: City,
    pub state: State,
}

/// Body of `POST /cities`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCityInput {
    pub name: String,
    pub state_id: StateId,
}

/// Body of `PATCH /cities/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCityInput {
    pub name: Option<String>,
    pub state_id: Option<StateId>,
}

/// A validated city ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewCity {
    pub name: EntityName,
    pub state_id: StateId,
}

/// Validated changes to apply to a city.
#[derive(Debug, Clone, Default)]
pub struct CityChanges {
    pub name: Option<EntityName>,
    pub state_id: Option<StateId>,
}
