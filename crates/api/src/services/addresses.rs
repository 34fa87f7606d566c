//! Address service.

use tracing::{info, instrument};

use client_directory_core::AddressId;

use super::{ClientService, DirectoryError, LocationService, on_existing, require_text};
use crate::db::{RepositoryError, Store};
use crate::models::{Address, AddressDetail, CreateAddressInput, UpdateAddressInput};

const ENTITY: &str = "address";

/// Addresses link a client to a location.
pub struct AddressService<'a> {
    store: &'a dyn Store,
}

impl<'a> AddressService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Fetch an address.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no address has this id.
    pub async fn by_id(&self, id: AddressId) -> Result<Address, DirectoryError> {
        self.store
            .address_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(ENTITY, id))
    }

    /// Fetch an address with its client and its location, city and state.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no address has this id.
    pub async fn find_one(&self, id: AddressId) -> Result<AddressDetail, DirectoryError> {
        let address = self.by_id(id).await?;
        let client = self.store.client_by_id(address.client_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("address {id} has no client"))
        })?;
        let location = self
            .store
            .location_placement(address.location_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!("address {id} has no location"))
            })?;

        Ok(AddressDetail {
            address,
            client,
            location,
        })
    }

    /// All addresses, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn find_all(&self) -> Result<Vec<Address>, DirectoryError> {
        Ok(self.store.list_addresses().await?)
    }

    /// Create an address for an existing client in an existing location.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the client or the location does
    /// not exist and `DirectoryError::InvalidInput` for blank fields.
    #[instrument(
        skip(self, input),
        fields(client_id = %input.client_id, location_id = %input.location_id)
    )]
    pub async fn create(&self, input: CreateAddressInput) -> Result<Address, DirectoryError> {
        require_text("street", &input.street)?;
        require_text("outNum", &input.out_num)?;
        require_text("zipCode", &input.zip_code)?;

        ClientService::new(self.store).by_id(input.client_id).await?;
        LocationService::new(self.store)
            .by_id(input.location_id)
            .await?;

        let address = self.store.insert_address(&input).await?;

        info!(address_id = %address.id, "Created address");
        Ok(address)
    }

    /// Apply a partial update. Absent fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the address, or a newly
    /// referenced client or location, does not exist.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: AddressId,
        input: UpdateAddressInput,
    ) -> Result<Address, DirectoryError> {
        self.by_id(id).await?;
        if let Some(street) = &input.street {
            require_text("street", street)?;
        }
        if let Some(out_num) = &input.out_num {
            require_text("outNum", out_num)?;
        }
        if let Some(zip_code) = &input.zip_code {
            require_text("zipCode", zip_code)?;
        }
        if let Some(client_id) = input.client_id {
            ClientService::new(self.store).by_id(client_id).await?;
        }
        if let Some(location_id) = input.location_id {
            LocationService::new(self.store).by_id(location_id).await?;
        }

        let address = self.store.update_address(id, &input).await?;

        info!(address_id = %id, "Updated address");
        Ok(address)
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the address does not exist.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: AddressId) -> Result<Address, DirectoryError> {
        self.by_id(id).await?;
        let address = self
            .store
            .delete_address(id)
            .await
            .map_err(on_existing(ENTITY, id.as_i32()))?;

        info!(address_id = %id, "Deleted address");
        Ok(address)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use client_directory_core::{ClientId, LocationId};

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{
        Client, CreateCityInput, CreateClientInput, CreateLocationInput, CreateStateInput,
        Location,
    };
    use crate::services::{CityService, StateService};

    async fn fixtures(store: &MemoryStore) -> (Client, Location) {
        let state = StateService::new(store)
            .create(CreateStateInput {
                name: "Puebla".to_string(),
            })
            .await
            .unwrap();
        let city = CityService::new(store)
            .create(CreateCityInput {
                name: "San Andrés Cholula".to_string(),
                state_id: state.id,
            })
            .await
            .unwrap();
        let location = LocationService::new(store)
            .create(CreateLocationInput {
                name: "Tlaxcalancingo".to_string(),
                city_id: city.id,
            })
            .await
            .unwrap();
        let client = ClientService::new(store)
            .create(CreateClientInput {
                name: "Ana".to_string(),
                last_name: "López".to_string(),
                rfc: None,
                email: None,
                phone: None,
                status: true,
            })
            .await
            .unwrap();
        (client, location)
    }

    fn create(client_id: ClientId, location_id: LocationId) -> CreateAddressInput {
        CreateAddressInput {
            street: "Av. Juárez".to_string(),
            out_num: "12".to_string(),
            int_num: None,
            zip_code: "72810".to_string(),
            client_id,
            location_id,
        }
    }

    #[tokio::test]
    async fn test_create_requires_client_and_location() {
        let store = MemoryStore::new();
        let (client, location) = fixtures(&store).await;
        let service = AddressService::new(&store);

        let err = service
            .create(create(ClientId::new(40), location.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { entity: "client", .. }));

        let err = service
            .create(create(client.id, LocationId::new(40)))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { entity: "location", .. }));
    }

    #[tokio::test]
    async fn test_find_one_places_address() {
        let store = MemoryStore::new();
        let (client, location) = fixtures(&store).await;
        let service = AddressService::new(&store);
        let address = service.create(create(client.id, location.id)).await.unwrap();

        let detail = service.find_one(address.id).await.unwrap();
        assert_eq!(detail.client, client);
        assert_eq!(detail.location.location, location);
        assert_eq!(detail.location.city.city.name, "San Andrés Cholula");
        assert_eq!(detail.location.city.state.name, "Puebla");

        let owned = ClientService::new(&store).find_one(client.id).await.unwrap();
        assert_eq!(owned.addresses.len(), 1);
        assert_eq!(owned.addresses[0].address, address);
    }

    #[tokio::test]
    async fn test_partial_update_and_remove() {
        let store = MemoryStore::new();
        let (client, location) = fixtures(&store).await;
        let service = AddressService::new(&store);
        let address = service.create(create(client.id, location.id)).await.unwrap();

        let updated = service
            .update(
                address.id,
                UpdateAddressInput {
                    int_num: Some(Some("3B".to_string())),
                    ..UpdateAddressInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.int_num.as_deref(), Some("3B"));
        assert_eq!(updated.street, "Av. Juárez");

        let err = ClientService::new(&store).remove(client.id).await.unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Repository(RepositoryError::Conflict(_))
        ));

        assert_eq!(service.remove(address.id).await.unwrap(), updated);
        assert!(ClientService::new(&store).remove(client.id).await.is_ok());
    }
}
