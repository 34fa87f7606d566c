//! City queries for [`PgStore`].

use async_trait::async_trait;

use client_directory_core::{CityId, StateId};

use super::{CityStore, PgStore, RepositoryError, map_delete_error, map_write_error};
use crate::models::{City, CityChanges, NewCity};

/// Internal row type for city queries.
#[derive(Debug, sqlx::FromRow)]
struct CityRow {
    id: i32,
    name: String,
    state_id: i32,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        Self {
            id: CityId::new(row.id),
            name: row.name,
            state_id: StateId::new(row.state_id),
        }
    }
}

#[async_trait]
impl CityStore for PgStore {
    async fn city_by_id(&self, id: CityId) -> Result<Option<City>, RepositoryError> {
        let row = sqlx::query_as::<_, CityRow>(
            r"
            SELECT id, name, state_id
            FROM cities
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_cities(&self) -> Result<Vec<City>, RepositoryError> {
        let rows = sqlx::query_as::<_, CityRow>(
            r"
            SELECT id, name, state_id
            FROM cities
            ORDER BY id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn cities_in_state(&self, state_id: StateId) -> Result<Vec<City>, RepositoryError> {
        let rows = sqlx::query_as::<_, CityRow>(
            r"
            SELECT id, name, state_id
            FROM cities
            WHERE state_id = $1
            ORDER BY id
            ",
        )
        .bind(state_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn city_by_name_key(
        &self,
        state_id: StateId,
        key: &str,
    ) -> Result<Option<City>, RepositoryError> {
        let row = sqlx::query_as::<_, CityRow>(
            r"
            SELECT id, name, state_id
            FROM cities
            WHERE state_id = $1 AND name_key = $2
            ",
        )
        .bind(state_id)
        .bind(key)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_city(&self, new: &NewCity) -> Result<City, RepositoryError> {
        let row = sqlx::query_as::<_, CityRow>(
            r"
            INSERT INTO cities (name, name_key, state_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, state_id
            ",
        )
        .bind(new.name.as_str())
        .bind(new.name.key())
        .bind(new.state_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn update_city(
        &self,
        id: CityId,
        changes: &CityChanges,
    ) -> Result<City, RepositoryError> {
        let row = sqlx::query_as::<_, CityRow>(
            r"
            UPDATE cities
            SET
                name = COALESCE($2, name),
                name_key = COALESCE($3, name_key),
                state_id = COALESCE($4, state_id)
            WHERE id = $1
            RETURNING id, name, state_id
            ",
        )
        .bind(id)
        .bind(changes.name.as_ref().map(|n| n.as_str()))
        .bind(changes.name.as_ref().map(|n| n.key()))
        .bind(changes.state_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_city(&self, id: CityId) -> Result<City, RepositoryError> {
        let row = sqlx::query_as::<_, CityRow>(
            r"
            DELETE FROM cities
            WHERE id = $1
            RETURNING id, name, state_id
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_delete_error(e, "locations"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
