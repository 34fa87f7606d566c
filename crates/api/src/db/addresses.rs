//! Address queries for [`PgStore`].

use async_trait::async_trait;

use client_directory_core::{AddressId, CityId, ClientId, LocationId, StateId};

use super::{AddressStore, PgStore, RepositoryError, map_delete_error, map_write_error};
use crate::models::{
    Address, AddressWithLocation, City, CityWithState, CreateAddressInput, Location,
    LocationPlacement, State, UpdateAddressInput,
};

/// Internal row type for address queries.
#[derive(Debug, sqlx::FromRow)]
struct AddressRow {
    id: i32,
    street: String,
    out_num: String,
    int_num: Option<String>,
    zip_code: String,
    client_id: i32,
    location_id: i32,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: AddressId::new(row.id),
            street: row.street,
            out_num: row.out_num,
            int_num: row.int_num,
            zip_code: row.zip_code,
            client_id: ClientId::new(row.client_id),
            location_id: LocationId::new(row.location_id),
        }
    }
}

/// Internal row type for an address joined with its location, city and state.
#[derive(Debug, sqlx::FromRow)]
struct PlacedAddressRow {
    #[sqlx(flatten)]
    address: AddressRow,
    location_name: String,
    city_id: i32,
    city_name: String,
    state_id: i32,
    state_name: String,
}

impl From<PlacedAddressRow> for AddressWithLocation {
    fn from(row: PlacedAddressRow) -> Self {
        let address = Address::from(row.address);
        let city_id = CityId::new(row.city_id);
        let state_id = StateId::new(row.state_id);
        let location = LocationPlacement {
            location: Location {
                id: address.location_id,
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
        };
        Self { address, location }
    }
}

#[async_trait]
impl AddressStore for PgStore {
    async fn address_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, street, out_num, int_num, zip_code, client_id, location_id
            FROM addresses
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(
            r"
            SELECT id, street, out_num, int_num, zip_code, client_id, location_id
            FROM addresses
            ORDER BY id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn addresses_of_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<AddressWithLocation>, RepositoryError> {
        let rows = sqlx::query_as::<_, PlacedAddressRow>(
            r"
            SELECT
                a.id, a.street, a.out_num, a.int_num, a.zip_code, a.client_id, a.location_id,
                l.name AS location_name,
                c.id AS city_id, c.name AS city_name,
                s.id AS state_id, s.name AS state_name
            FROM addresses a
            JOIN locations l ON l.id = a.location_id
            JOIN cities c ON c.id = l.city_id
            JOIN states s ON s.id = c.state_id
            WHERE a.client_id = $1
            ORDER BY a.id
            ",
        )
        .bind(client_id)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_address(
        &self,
        input: &CreateAddressInput,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            INSERT INTO addresses (street, out_num, int_num, zip_code, client_id, location_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, street, out_num, int_num, zip_code, client_id, location_id
            ",
        )
        .bind(&input.street)
        .bind(&input.out_num)
        .bind(input.int_num.as_deref())
        .bind(&input.zip_code)
        .bind(input.client_id)
        .bind(input.location_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn update_address(
        &self,
        id: AddressId,
        input: &UpdateAddressInput,
    ) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            UPDATE addresses
            SET
                street = COALESCE($2, street),
                out_num = COALESCE($3, out_num),
                int_num = CASE WHEN $4 THEN $5 ELSE int_num END,
                zip_code = COALESCE($6, zip_code),
                client_id = COALESCE($7, client_id),
                location_id = COALESCE($8, location_id)
            WHERE id = $1
            RETURNING id, street, out_num, int_num, zip_code, client_id, location_id
            ",
        )
        .bind(id)
        .bind(input.street.as_deref())
        .bind(input.out_num.as_deref())
        .bind(input.int_num.is_some())
        .bind(input.int_num.as_ref().and_then(Option::as_deref))
        .bind(input.zip_code.as_deref())
        .bind(input.client_id)
        .bind(input.location_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_address(&self, id: AddressId) -> Result<Address, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(
            r"
            DELETE FROM addresses
            WHERE id = $1
            RETURNING id, street, out_num, int_num, zip_code, client_id, location_id
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_delete_error(e, "dependents"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
