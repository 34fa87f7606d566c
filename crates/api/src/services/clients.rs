//! Client service.

use tracing::{info, instrument};

use client_directory_core::ClientId;

use super::{DirectoryError, on_existing, require_text};
use crate::db::Store;
use crate::models::{Client, ClientWithAddresses, CreateClientInput, UpdateClientInput};

const ENTITY: &str = "client";

/// Clients. There is no uniqueness rule on client names.
pub struct ClientService<'a> {
    store: &'a dyn Store,
}

impl<'a> ClientService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Fetch a client.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no client has this id.
    pub async fn by_id(&self, id: ClientId) -> Result<Client, DirectoryError> {
        self.store
            .client_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(ENTITY, id))
    }

    /// Fetch a client with every address it owns, each placed in its
    /// location, city and state.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no client has this id.
    pub async fn find_one(&self, id: ClientId) -> Result<ClientWithAddresses, DirectoryError> {
        let client = self.by_id(id).await?;
        let addresses = self.store.addresses_of_client(id).await?;
        Ok(ClientWithAddresses { client, addresses })
    }

    /// All clients, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn find_all(&self) -> Result<Vec<Client>, DirectoryError> {
        Ok(self.store.list_clients().await?)
    }

    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidInput` if the name or last name is
    /// blank.
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateClientInput) -> Result<Client, DirectoryError> {
        require_text("name", &input.name)?;
        require_text("lastName", &input.last_name)?;

        let client = self.store.insert_client(&input).await?;

        info!(client_id = %client.id, "Created client");
        Ok(client)
    }

    /// Apply a partial update. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the client does not exist and
    /// `DirectoryError::InvalidInput` for a blank name or last name.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: ClientId,
        input: UpdateClientInput,
    ) -> Result<Client, DirectoryError> {
        self.by_id(id).await?;
        if let Some(name) = &input.name {
            require_text("name", name)?;
        }
        if let Some(last_name) = &input.last_name {
            require_text("lastName", last_name)?;
        }

        let client = self
            .store
            .update_client(id, &input)
            .await
            .map_err(on_existing(ENTITY, id.as_i32()))?;

        info!(client_id = %id, "Updated client");
        Ok(client)
    }

    /// Delete a client that owns no addresses.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the client does not exist and a
    /// `Conflict` repository error while addresses still reference it.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: ClientId) -> Result<Client, DirectoryError> {
        self.by_id(id).await?;
        let client = self
            .store
            .delete_client(id)
            .await
            .map_err(on_existing(ENTITY, id.as_i32()))?;

        info!(client_id = %id, "Deleted client");
        Ok(client)
    }
}
