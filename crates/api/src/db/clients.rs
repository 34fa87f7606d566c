//! Client queries for [`PgStore`].

use async_trait::async_trait;

use client_directory_core::{ClientId, Email};

use super::{ClientStore, PgStore, RepositoryError, map_delete_error, map_write_error};
use crate::models::{Client, CreateClientInput, UpdateClientInput};

/// Internal row type for client queries.
#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: i32,
    name: String,
    last_name: String,
    rfc: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    status: bool,
}

impl TryFrom<ClientRow> for Client {
    type Error = RepositoryError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let email = row
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: ClientId::new(row.id),
            name: row.name,
            last_name: row.last_name,
            rfc: row.rfc,
            email,
            phone: row.phone,
            status: row.status,
        })
    }
}

#[async_trait]
impl ClientStore for PgStore {
    async fn client_by_id(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r"
            SELECT id, name, last_name, rfc, email, phone, status
            FROM clients
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let rows = sqlx::query_as::<_, ClientRow>(
            r"
            SELECT id, name, last_name, rfc, email, phone, status
            FROM clients
            ORDER BY id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn insert_client(&self, input: &CreateClientInput) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r"
            INSERT INTO clients (name, last_name, rfc, email, phone, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, last_name, rfc, email, phone, status
            ",
        )
        .bind(&input.name)
        .bind(&input.last_name)
        .bind(input.rfc.as_deref())
        .bind(input.email.as_ref().map(Email::as_str))
        .bind(input.phone.as_deref())
        .bind(input.status)
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    async fn update_client(
        &self,
        id: ClientId,
        input: &UpdateClientInput,
    ) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r"
            UPDATE clients
            SET
                name = COALESCE($2, name),
                last_name = COALESCE($3, last_name),
                rfc = CASE WHEN $4 THEN $5 ELSE rfc END,
                email = CASE WHEN $6 THEN $7 ELSE email END,
                phone = CASE WHEN $8 THEN $9 ELSE phone END,
                status = COALESCE($10, status)
            WHERE id = $1
            RETURNING id, name, last_name, rfc, email, phone, status
            ",
        )
        .bind(id)
        .bind(input.name.as_deref())
        .bind(input.last_name.as_deref())
        .bind(input.rfc.is_some())
        .bind(input.rfc.as_ref().and_then(Option::as_deref))
        .bind(input.email.is_some())
        .bind(input.email.as_ref().and_then(|e| e.as_ref().map(Email::as_str)))
        .bind(input.phone.is_some())
        .bind(input.phone.as_ref().and_then(Option::as_deref))
        .bind(input.status)
        .fetch_optional(self.pool())
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn delete_client(&self, id: ClientId) -> Result<Client, RepositoryError> {
        let row = sqlx::query_as::<_, ClientRow>(
            r"
            DELETE FROM clients
            WHERE id = $1
            RETURNING id, name, last_name, rfc, email, phone, status
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_delete_error(e, "addresses"))?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
