//! State queries for [`PgStore`].

use async_trait::async_trait;

use client_directory_core::StateId;

use super::{PgStore, RepositoryError, StateStore, map_delete_error, map_write_error};
use crate::models::{NewState, State, StateChanges};

/// Internal row type for state queries.
#[derive(Debug, sqlx::FromRow)]
struct StateRow {
    id: i32,
    name: String,
}

impl From<StateRow> for State {
    fn from(row: StateRow) -> Self {
        Self {
            id: StateId::new(row.id),
            name: row.name,
        }
    }
}

#[async_trait]
impl StateStore for PgStore {
    async fn state_by_id(&self, id: StateId) -> Result<Option<State>, RepositoryError> {
        let row = sqlx::query_as::<_, StateRow>(
            r"
            SELECT id, name
            FROM states
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_states(&self) -> Result<Vec<State>, RepositoryError> {
        let rows = sqlx::query_as::<_, StateRow>(
            r"
            SELECT id, name
            FROM states
            ORDER BY id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn state_by_name_key(&self, key: &str) -> Result<Option<State>, RepositoryError> {
        let row = sqlx::query_as::<_, StateRow>(
            r"
            SELECT id, name
            FROM states
            WHERE name_key = $1
            ",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_state(&self, new: &NewState) -> Result<State, RepositoryError> {
        let row = sqlx::query_as::<_, StateRow>(
            r"
            INSERT INTO states (name, name_key)
            VALUES ($1, $2)
            RETURNING id, name
            ",
        )
        .bind(new.name.as_str())
        .bind(new.name.key())
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn update_state(
        &self,
        id: StateId,
        changes: &StateChanges,
    ) -> Result<State, RepositoryError> {
        let row = sqlx::query_as::<_, StateRow>(
            r"
            UPDATE states
            SET
                name = COALESCE($2, name),
                name_key = COALESCE($3, name_key)
            WHERE id = $1
            RETURNING id, name
            ",
        )
        .bind(id)
        .bind(changes.name.as_ref().map(|n| n.as_str()))
        .bind(changes.name.as_ref().map(|n| n.key()))
        .fetch_optional(self.pool())
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_state(&self, id: StateId) -> Result<State, RepositoryError> {
        let row = sqlx::query_as::<_, StateRow>(
            r"
            DELETE FROM states
            WHERE id = $1
            RETURNING id, name
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_delete_error(e, "cities"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
