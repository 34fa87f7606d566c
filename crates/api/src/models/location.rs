//! Location (neighbourhood or locality inside a city).

use serde::{Deserialize, Serialize};

use client_directory_core::{CityId, EntityName, LocationId};

use super::city::{City, CityWithState};

/// A location. Its name is unique within its city after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub city_id: CityId,
}

/// A location with its city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationWithCity {
    #[serde(flatten)]
    pub location: Location,
    pub city: City,
}

/// A location with its full chain of parents (city and state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationPlacement {
    #[serde(flatten)]
    pub location: Location,
    pub city: CityWithState,
}

/// Body of `POST /locations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationInput {
    pub name: String,
    pub city_id: CityId,
}

/// Body of `PATCH /locations/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationInput {
    pub name: Option<String>,
    pub city_id: Option<CityId>,
}

/// A validated location ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: EntityName,
    pub city_id: CityId,
}

/// Validated changes to apply to a location.
#[derive(Debug, Clone, Default)]
pub struct LocationChanges {
    pub name: Option<EntityName>,
    pub city_id: Option<CityId>,
}
