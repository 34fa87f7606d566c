//! Location queries for [`PgStore`].

use async_trait::async_trait;

use client_directory_core::{CityId, LocationId, StateId};

use super::{LocationStore, PgStore, RepositoryError, map_delete_error, map_write_error};
use crate::models::{
    City, CityWithState, Location, LocationChanges, LocationPlacement, NewLocation, State,
};

/// Internal row type for location queries.
#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id: i32,
    name: String,
    city_id: i32,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: LocationId::new(row.id),
            name: row.name,
            city_id: CityId::new(row.city_id),
        }
    }
}

/// Internal row type for a location joined with its city and state.
#[derive(Debug, sqlx::FromRow)]
struct PlacementRow {
    location_id: i32,
    location_name: String,
    city_id: i32,
    city_name: String,
    state_id: i32,
    state_name: String,
}

impl From<PlacementRow> for LocationPlacement {
    fn from(row: PlacementRow) -> Self {
        let city_id = CityId::new(row.city_id);
        let state_id = StateId::new(row.state_id);
        Self {
            location: Location {
                id: LocationId::new(row.location_id),
                name: row.location_name,
                city_id,
            },
            city: CityWithState {
                city: City {
                    id: city_id,
                    name: row.city_name,
                    state_id,
                },
                state: State {
                    id: state_id,
                    name: row.state_name,
                },
            },
        }
    }
}

#[async_trait]
impl LocationStore for PgStore {
    async fn location_by_id(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r"
            SELECT id, name, city_id
            FROM locations
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_locations(&self) -> Result<Vec<Location>, RepositoryError> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r"
            SELECT id, name, city_id
            FROM locations
            ORDER BY id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn locations_in_city(&self, city_id: CityId) -> Result<Vec<Location>, RepositoryError> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r"
            SELECT id, name, city_id
            FROM locations
            WHERE city_id = $1
            ORDER BY id
            ",
        )
        .bind(city_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn location_by_name_key(
        &self,
        city_id: CityId,
        key: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r"
            SELECT id, name, city_id
            FROM locations
            WHERE city_id = $1 AND name_key = $2
            ",
        )
        .bind(city_id)
        .bind(key)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn location_placement(
        &self,
        id: LocationId,
    ) -> Result<Option<LocationPlacement>, RepositoryError> {
        let row = sqlx::query_as::<_, PlacementRow>(
            r"
            SELECT
                l.id AS location_id, l.name AS location_name,
                c.id AS city_id, c.name AS city_name,
                s.id AS state_id, s.name AS state_name
            FROM locations l
            JOIN cities c ON c.id = l.city_id
            JOIN states s ON s.id = c.state_id
            WHERE l.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_location(&self, new: &NewLocation) -> Result<Location, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r"
            INSERT INTO locations (name, name_key, city_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, city_id
            ",
        )
        .bind(new.name.as_str())
        .bind(new.name.key())
        .bind(new.city_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn update_location(
        &self,
        id: LocationId,
        changes: &LocationChanges,
    ) -> Result<Location, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r"
            UPDATE locations
            SET
                name = COALESCE($2, name),
                name_key = COALESCE($3, name_key),
                city_id = COALESCE($4, city_id)
            WHERE id = $1
            RETURNING id, name, city_id
            ",
        )
        .bind(id)
        .bind(changes.name.as_ref().map(|n| n.as_str()))
        .bind(changes.name.as_ref().map(|n| n.key()))
        .bind(changes.city_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_location(&self, id: LocationId) -> Result<Location, RepositoryError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r"
            DELETE FROM locations
            WHERE id = $1
            RETURNING id, name, city_id
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_delete_error(e, "addresses"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
