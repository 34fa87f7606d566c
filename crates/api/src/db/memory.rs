//! In-process [`Store`] for local development and tests.
//!
//! Mirrors the `PostgreSQL` schema: ids come from per-table sequences and
//! are never reused, the `name_key` unique indexes are checked on every
//! write, and foreign keys are restricted on delete.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use client_directory_core::{AddressId, CityId, ClientId, LocationId, StateId};

use super::{
    AddressStore, CityStore, ClientStore, LocationStore, RepositoryError, StateStore, Store,
    restricted, unique_message,
};
use crate::models::{
    Address, AddressWithLocation, City, CityChanges, CityWithState, Client, CreateAddressInput,
    CreateClientInput, Location, LocationChanges, LocationPlacement, NewCity, NewLocation,
    NewState, State, StateChanges, UpdateAddressInput, UpdateClientInput,
};

/// A stored row together with its normalized name.
#[derive(Debug, Clone)]
struct Keyed<T> {
    row: T,
    key: String,
}

#[derive(Debug, Default)]
struct Sequences {
    state: i32,
    city: i32,
    location: i32,
    client: i32,
    address: i32,
}

fn next(seq: &mut i32) -> i32 {
    *seq += 1;
    *seq
}

#[derive(Debug, Default)]
struct Tables {
    states: BTreeMap<StateId, Keyed<State>>,
    cities: BTreeMap<CityId, Keyed<City>>,
    locations: BTreeMap<LocationId, Keyed<Location>>,
    clients: BTreeMap<ClientId, Client>,
    addresses: BTreeMap<AddressId, Address>,
    seq: Sequences,
}

fn conflict(constraint: &str) -> RepositoryError {
    RepositoryError::Conflict(unique_message(constraint).unwrap_or("duplicate value").to_string())
}

impl Tables {
    fn state_key_taken(&self, key: &str, except: Option<StateId>) -> bool {
        self.states
            .iter()
            .any(|(id, s)| Some(*id) != except && s.key == key)
    }

    fn city_key_taken(&self, state_id: StateId, key: &str, except: Option<CityId>) -> bool {
        self.cities
            .iter()
            .any(|(id, c)| Some(*id) != except && c.row.state_id == state_id && c.key == key)
    }

    fn location_key_taken(&self, city_id: CityId, key: &str, except: Option<LocationId>) -> bool {
        self.locations
            .iter()
            .any(|(id, l)| Some(*id) != except && l.row.city_id == city_id && l.key == key)
    }

    fn placement(&self, id: LocationId) -> Result<Option<LocationPlacement>, RepositoryError> {
        let Some(location) = self.locations.get(&id) else {
            return Ok(None);
        };
        let city = self
            .cities
            .get(&location.row.city_id)
            .ok_or_else(|| RepositoryError::DataCorruption(format!("location {id} has no city")))?;
        let state = self.states.get(&city.row.state_id).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("city {} has no state", city.row.id))
        })?;

        Ok(Some(LocationPlacement {
            location: location.row.clone(),
            city: CityWithState {
                city: city.row.clone(),
                state: state.row.clone(),
            },
        }))
    }
}

/// In-memory [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn state_by_id(&self, id: StateId) -> Result<Option<State>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.states.get(&id).map(|s| s.row.clone()))
    }

    async fn list_states(&self) -> Result<Vec<State>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.states.values().map(|s| s.row.clone()).collect())
    }

    async fn state_by_name_key(&self, key: &str) -> Result<Option<State>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .states
            .values()
            .find(|s| s.key == key)
            .map(|s| s.row.clone()))
    }

    async fn insert_state(&self, new: &NewState) -> Result<State, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.state_key_taken(new.name.key(), None) {
            return Err(conflict("states_name_key_idx"));
        }

        let id = StateId::new(next(&mut tables.seq.state));
        let state = State {
            id,
            name: new.name.as_str().to_string(),
        };
        tables.states.insert(
            id,
            Keyed {
                row: state.clone(),
                key: new.name.key().to_string(),
            },
        );
        Ok(state)
    }

    async fn update_state(
        &self,
        id: StateId,
        changes: &StateChanges,
    ) -> Result<State, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.states.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if let Some(name) = &changes.name
            && tables.state_key_taken(name.key(), Some(id))
        {
            return Err(conflict("states_name_key_idx"));
        }

        let stored = tables.states.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &changes.name {
            stored.row.name = name.as_str().to_string();
            stored.key = name.key().to_string();
        }
        Ok(stored.row.clone())
    }

    async fn delete_state(&self, id: StateId) -> Result<State, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.cities.values().any(|c| c.row.state_id == id) {
            return Err(restricted("cities"));
        }
        tables
            .states
            .remove(&id)
            .map(|s| s.row)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl CityStore for MemoryStore {
    async fn city_by_id(&self, id: CityId) -> Result<Option<City>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.cities.get(&id).map(|c| c.row.clone()))
    }

    async fn list_cities(&self) -> Result<Vec<City>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.cities.values().map(|c| c.row.clone()).collect())
    }

    async fn cities_in_state(&self, state_id: StateId) -> Result<Vec<City>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cities
            .values()
            .filter(|c| c.row.state_id == state_id)
            .map(|c| c.row.clone())
            .collect())
    }

    async fn city_by_name_key(
        &self,
        state_id: StateId,
        key: &str,
    ) -> Result<Option<City>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .cities
            .values()
            .find(|c| c.row.state_id == state_id && c.key == key)
            .map(|c| c.row.clone()))
    }

    async fn insert_city(&self, new: &NewCity) -> Result<City, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.states.contains_key(&new.state_id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.city_key_taken(new.state_id, new.name.key(), None) {
            return Err(conflict("cities_state_name_key_idx"));
        }

        let id = CityId::new(next(&mut tables.seq.city));
        let city = City {
            id,
            name: new.name.as_str().to_string(),
            state_id: new.state_id,
        };
        tables.cities.insert(
            id,
            Keyed {
                row: city.clone(),
                key: new.name.key().to_string(),
            },
        );
        Ok(city)
    }

    async fn update_city(
        &self,
        id: CityId,
        changes: &CityChanges,
    ) -> Result<City, RepositoryError> {
        let mut tables = self.tables.write().await;
        let current = tables.cities.get(&id).ok_or(RepositoryError::NotFound)?;

        let state_id = changes.state_id.unwrap_or(current.row.state_id);
        let key = changes
            .name
            .as_ref()
            .map_or_else(|| current.key.clone(), |n| n.key().to_string());
        if !tables.states.contains_key(&state_id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.city_key_taken(state_id, &key, Some(id)) {
            return Err(conflict("cities_state_name_key_idx"));
        }

        let stored = tables.cities.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &changes.name {
            stored.row.name = name.as_str().to_string();
        }
        stored.row.state_id = state_id;
        stored.key = key;
        Ok(stored.row.clone())
    }

    async fn delete_city(&self, id: CityId) -> Result<City, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.locations.values().any(|l| l.row.city_id == id) {
            return Err(restricted("locations"));
        }
        tables
            .cities
            .remove(&id)
            .map(|c| c.row)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn location_by_id(&self, id: LocationId) -> Result<Option<Location>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.locations.get(&id).map(|l| l.row.clone()))
    }

    async fn list_locations(&self) -> Result<Vec<Location>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.locations.values().map(|l| l.row.clone()).collect())
    }

    async fn locations_in_city(&self, city_id: CityId) -> Result<Vec<Location>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .locations
            .values()
            .filter(|l| l.row.city_id == city_id)
            .map(|l| l.row.clone())
            .collect())
    }

    async fn location_by_name_key(
        &self,
        city_id: CityId,
        key: &str,
    ) -> Result<Option<Location>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .locations
            .values()
            .find(|l| l.row.city_id == city_id && l.key == key)
            .map(|l| l.row.clone()))
    }

    async fn location_placement(
        &self,
        id: LocationId,
    ) -> Result<Option<LocationPlacement>, RepositoryError> {
        self.tables.read().await.placement(id)
    }

    async fn insert_location(&self, new: &NewLocation) -> Result<Location, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.cities.contains_key(&new.city_id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.location_key_taken(new.city_id, new.name.key(), None) {
            return Err(conflict("locations_city_name_key_idx"));
        }

        let id = LocationId::new(next(&mut tables.seq.location));
        let location = Location {
            id,
            name: new.name.as_str().to_string(),
            city_id: new.city_id,
        };
        tables.locations.insert(
            id,
            Keyed {
                row: location.clone(),
                key: new.name.key().to_string(),
            },
        );
        Ok(location)
    }

    async fn update_location(
        &self,
        id: LocationId,
        changes: &LocationChanges,
    ) -> Result<Location, RepositoryError> {
        let mut tables = self.tables.write().await;
        let current = tables.locations.get(&id).ok_or(RepositoryError::NotFound)?;

        let city_id = changes.city_id.unwrap_or(current.row.city_id);
        let key = changes
            .name
            .as_ref()
            .map_or_else(|| current.key.clone(), |n| n.key().to_string());
        if !tables.cities.contains_key(&city_id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.location_key_taken(city_id, &key, Some(id)) {
            return Err(conflict("locations_city_name_key_idx"));
        }

        let stored = tables.locations.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if let Some(name) = &changes.name {
            stored.row.name = name.as_str().to_string();
        }
        stored.row.city_id = city_id;
        stored.key = key;
        Ok(stored.row.clone())
    }

    async fn delete_location(&self, id: LocationId) -> Result<Location, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.addresses.values().any(|a| a.location_id == id) {
            return Err(restricted("addresses"));
        }
        tables
            .locations
            .remove(&id)
            .map(|l| l.row)
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl ClientStore for MemoryStore {
    async fn client_by_id(&self, id: ClientId) -> Result<Option<Client>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.clients.get(&id).cloned())
    }

    async fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.clients.values().cloned().collect())
    }

    async fn insert_client(&self, input: &CreateClientInput) -> Result<Client, RepositoryError> {
        let mut tables = self.tables.write().await;
        let id = ClientId::new(next(&mut tables.seq.client));
        let client = Client {
            id,
            name: input.name.clone(),
            last_name: input.last_name.clone(),
            rfc: input.rfc.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            status: input.status,
        };
        tables.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn update_client(
        &self,
        id: ClientId,
        input: &UpdateClientInput,
    ) -> Result<Client, RepositoryError> {
        let mut tables = self.tables.write().await;
        let client = tables.clients.get_mut(&id).ok_or(RepositoryError::NotFound)?;

        if let Some(name) = &input.name {
            client.name.clone_from(name);
        }
        if let Some(last_name) = &input.last_name {
            client.last_name.clone_from(last_name);
        }
        if let Some(rfc) = &input.rfc {
            client.rfc.clone_from(rfc);
        }
        if let Some(email) = &input.email {
            client.email.clone_from(email);
        }
        if let Some(phone) = &input.phone {
            client.phone.clone_from(phone);
        }
        if let Some(status) = input.status {
            client.status = status;
        }
        Ok(client.clone())
    }

    async fn delete_client(&self, id: ClientId) -> Result<Client, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.addresses.values().any(|a| a.client_id == id) {
            return Err(restricted("addresses"));
        }
        tables.clients.remove(&id).ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl AddressStore for MemoryStore {
    async fn address_by_id(&self, id: AddressId) -> Result<Option<Address>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.addresses.get(&id).cloned())
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.addresses.values().cloned().collect())
    }

    async fn addresses_of_client(
        &self,
        client_id: ClientId,
    ) -> Result<Vec<AddressWithLocation>, RepositoryError> {
        let tables = self.tables.read().await;
        tables
            .addresses
            .values()
            .filter(|a| a.client_id == client_id)
            .map(|a| {
                let location = tables.placement(a.location_id)?.ok_or_else(|| {
                    RepositoryError::DataCorruption(format!("address {} has no location", a.id))
                })?;
                Ok(AddressWithLocation {
                    address: a.clone(),
                    location,
                })
            })
            .collect()
    }

    async fn insert_address(
        &self,
        input: &CreateAddressInput,
    ) -> Result<Address, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.clients.contains_key(&input.client_id)
            || !tables.locations.contains_key(&input.location_id)
        {
            return Err(RepositoryError::NotFound);
        }

        let id = AddressId::new(next(&mut tables.seq.address));
        let address = Address {
            id,
            street: input.street.clone(),
            out_num: input.out_num.clone(),
            int_num: input.int_num.clone(),
            zip_code: input.zip_code.clone(),
            client_id: input.client_id,
            location_id: input.location_id,
        };
        tables.addresses.insert(id, address.clone());
        Ok(address)
    }

    async fn update_address(
        &self,
        id: AddressId,
        input: &UpdateAddressInput,
    ) -> Result<Address, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.addresses.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if input
            .client_id
            .is_some_and(|c| !tables.clients.contains_key(&c))
            || input
                .location_id
                .is_some_and(|l| !tables.locations.contains_key(&l))
        {
            return Err(RepositoryError::NotFound);
        }

        let address = tables.addresses.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if let Some(street) = &input.street {
            address.street.clone_from(street);
        }
        if let Some(out_num) = &input.out_num {
            address.out_num.clone_from(out_num);
        }
        if let Some(int_num) = &input.int_num {
            address.int_num.clone_from(int_num);
        }
        if let Some(zip_code) = &input.zip_code {
            address.zip_code.clone_from(zip_code);
        }
        if let Some(client_id) = input.client_id {
            address.client_id = client_id;
        }
        if let Some(location_id) = input.location_id {
            address.location_id = location_id;
        }
        Ok(address.clone())
    }

    async fn delete_address(&self, id: AddressId) -> Result<Address, RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.addresses.remove(&id).ok_or(RepositoryError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use client_directory_core::EntityName;

    use super::*;

    fn new_state(name: &str) -> NewState {
        NewState {
            name: EntityName::new(name),
        }
    }

    fn new_city(name: &str, state_id: StateId) -> NewCity {
        NewCity {
            name: EntityName::new(name),
            state_id,
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_not_reused() {
        let store = MemoryStore::new();
        let a = store.insert_state(&new_state("Puebla")).await.unwrap();
        let b = store.insert_state(&new_state("Oaxaca")).await.unwrap();
        assert_eq!(a.id, StateId::new(1));
        assert_eq!(b.id, StateId::new(2));

        store.delete_state(b.id).await.unwrap();
        let c = store.insert_state(&new_state("Tlaxcala")).await.unwrap();
        assert_eq!(c.id, StateId::new(3));
    }

    #[tokio::test]
    async fn test_unique_state_key() {
        let store = MemoryStore::new();
        store.insert_state(&new_state("Michoacán")).await.unwrap();

        let err = store
            .insert_state(&new_state("MICHOACAN"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let found = store.state_by_name_key("michoacan").await.unwrap();
        assert_eq!(found.unwrap().name, "Michoacán");
    }

    #[tokio::test]
    async fn test_city_key_is_scoped_to_state() {
        let store = MemoryStore::new();
        let puebla = store.insert_state(&new_state("Puebla")).await.unwrap();
        let jalisco = store.insert_state(&new_state("Jalisco")).await.unwrap();

        store.insert_city(&new_city("Puebla", puebla.id)).await.unwrap();
        assert!(store.insert_city(&new_city("puebla", puebla.id)).await.is_err());
        assert!(store.insert_city(&new_city("Puebla", jalisco.id)).await.is_ok());
    }

    #[tokio::test]
    async fn test_city_requires_existing_state() {
        let store = MemoryStore::new();
        let err = store
            .insert_city(&new_city("Atlixco", StateId::new(99)))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_is_restricted_by_children() {
        let store = MemoryStore::new();
        let state = store.insert_state(&new_state("Puebla")).await.unwrap();
        let city = store.insert_city(&new_city("Cholula", state.id)).await.unwrap();

        let err = store.delete_state(state.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        store.delete_city(city.id).await.unwrap();
        assert_eq!(store.delete_state(state.id).await.unwrap(), state);
        assert!(matches!(
            store.delete_state(state.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_moving_city_checks_target_scope() {
        let store = MemoryStore::new();
        let a = store.insert_state(&new_state("Puebla")).await.unwrap();
        let b = store.insert_state(&new_state("Veracruz")).await.unwrap();
        let city = store.insert_city(&new_city("Córdoba", a.id)).await.unwrap();
        store.insert_city(&new_city("Cordoba", b.id)).await.unwrap();

        let changes = CityChanges {
            name: None,
            state_id: Some(b.id),
        };
        let err = store.update_city(city.id, &changes).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_location_placement() {
        let store = MemoryStore::new();
        let state = store.insert_state(&new_state("Puebla")).await.unwrap();
        let city = store.insert_city(&new_city("Puebla", state.id)).await.unwrap();
        let location = store
            .insert_location(&NewLocation {
                name: EntityName::new("Centro Histórico"),
                city_id: city.id,
            })
            .await
            .unwrap();

        let placement = store.location_placement(location.id).await.unwrap().unwrap();
        assert_eq!(placement.location, location);
        assert_eq!(placement.city.city, city);
        assert_eq!(placement.city.state, state);
        assert!(
            store
                .location_placement(LocationId::new(42))
                .await
                .unwrap()
                .is_none()
        );
    }
}
