//! State (top of the hierarchy).

use serde::{Deserialize, Serialize};

use client_directory_core::{EntityName, StateId};

use super::city::City;

/// A state. Its name is unique across all states after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
}

/// A state with the cities that belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateWithCities {
    #[serde(flatten)]
    pub state: State,
    pub cities: Vec<City>,
}

/// Body of `POST /states`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStateInput {
    pub name: String,
}

/// Body of `PATCH /states/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStateInput {
    pub name: Option<String>,
}

/// A validated state ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewState {
    pub name: EntityName,
}

/// Validated changes to apply to a state.
#[derive(Debug, Clone, Default)]
pub struct StateChanges {
    pub name: Option<EntityName>,
}
