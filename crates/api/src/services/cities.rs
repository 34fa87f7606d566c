//! City service.

use tracing::{info, instrument};

use client_directory_core::{CityId, StateId, normalize};

use super::{DirectoryError, StateService, on_existing, on_named_write, require_name};
use crate::db::Store;
use crate::models::{
    City, CityChanges, CityWithLocations, CreateCityInput, NewCity, UpdateCityInput,
};

const ENTITY: &str = "city";

/// Cities: names unique within their state.
pub struct CityService<'a> {
    store: &'a dyn Store,
}

impl<'a> CityService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Fetch a city.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no city has this id.
    pub async fn by_id(&self, id: CityId) -> Result<City, DirectoryError> {
        self.store
            .city_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(ENTITY, id))
    }

    /// Fetch a city with its locations.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no city has this id.
    pub async fn find_one(&self, id: CityId) -> Result<CityWithLocations, DirectoryError> {
        let city = self.by_id(id).await?;
        let locations = self.store.locations_in_city(id).await?;
        Ok(CityWithLocations { city, locations })
    }

    /// All cities, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn find_all(&self) -> Result<Vec<City>, DirectoryError> {
        Ok(self.store.list_cities().await?)
    }

    /// Find the city in `state_id` whose name is equivalent to `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn find_by_name(
        &self,
        state_id: StateId,
        name: &str,
    ) -> Result<Option<City>, DirectoryError> {
        Ok(self
            .store
            .city_by_name_key(state_id, &normalize(name))
            .await?)
    }

    /// Create a city in an existing state.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the state does not exist and
    /// `DirectoryError::AlreadyExists` if the state already has a city with
    /// an equivalent name.
    #[instrument(skip(self, input), fields(name = %input.name, state_id = %input.state_id))]
    pub async fn create(&self, input: CreateCityInput) -> Result<City, DirectoryError> {
        let name = require_name(input.name)?;
        StateService::new(self.store).by_id(input.state_id).await?;

        if self
            .store
            .city_by_name_key(input.state_id, name.key())
            .await?
            .is_some()
        {
            return Err(DirectoryError::already_exists(ENTITY, name.as_str()));
        }

        let new = NewCity {
            name,
            state_id: input.state_id,
        };
        let city = self
            .store
            .insert_city(&new)
            .await
            .map_err(on_named_write(ENTITY, new.name.as_str()))?;

        info!(city_id = %city.id, "Created city");
        Ok(city)
    }

    /// Rename a city or move it to another state.
    ///
    /// The duplicate check runs whenever the name or the state changes, at
    /// the state the city ends up in, ignoring the city itself.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the city or the target state
    /// does not exist and `DirectoryError::AlreadyExists` on a name clash.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: CityId, input: UpdateCityInput) -> Result<City, DirectoryError> {
        let current = self.by_id(id).await?;
        let name = input.name.map(require_name).transpose()?;

        if let Some(state_id) = input.state_id {
            StateService::new(self.store).by_id(state_id).await?;
        }

        let changes = CityChanges {
            name,
            state_id: input.state_id,
        };
        if changes.name.is_none() && changes.state_id.is_none() {
            return Ok(current);
        }

        let scope = changes.state_id.unwrap_or(current.state_id);
        let (display, key) = changes.name.as_ref().map_or_else(
            || (current.name.clone(), normalize(&current.name)),
            |n| (n.as_str().to_string(), n.key().to_string()),
        );
        if let Some(existing) = self.store.city_by_name_key(scope, &key).await?
            && existing.id != id
        {
            return Err(DirectoryError::already_exists(ENTITY, display));
        }

        let city = self
            .store
            .update_city(id, &changes)
            .await
            .map_err(on_named_write(ENTITY, &display))?;

        info!(city_id = %id, state_id = %city.state_id, "Updated city");
        Ok(city)
    }

    /// Delete a city that no location references.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the city does not exist and a
    /// `Conflict` repository error while locations still reference it.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: CityId) -> Result<City, DirectoryError> {
        self.by_id(id).await?;
        let city = self
            .store
            .delete_city(id)
            .await
            .map_err(on_existing(ENTITY, id.as_i32()))?;

        info!(city_id = %id, "Deleted city");
        Ok(city)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{CreateStateInput, State};

    async fn state(store: &MemoryStore, name: &str) -> State {
        StateService::new(store)
            .create(CreateStateInput {
                name: name.to_string(),
            })
            .await
            .unwrap()
    }

    fn create(name: &str, state_id: StateId) -> CreateCityInput {
        CreateCityInput {
            name: name.to_string(),
            state_id,
        }
    }

    #[tokio::test]
    async fn test_same_name_allowed_in_different_states() {
        let store = MemoryStore::new();
        let puebla = state(&store, "Puebla").await;
        let veracruz = state(&store, "Veracruz").await;
        let service = CityService::new(&store);

        service.create(create("Córdoba", puebla.id)).await.unwrap();
        let second = service.create(create("Córdoba", veracruz.id)).await.unwrap();
        assert_eq!(second.state_id, veracruz.id);

        let err = service
            .create(create("cordoba", puebla.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists { entity: "city", .. }));
    }

    #[tokio::test]
    async fn test_create_requires_state() {
        let store = MemoryStore::new();
        let err = CityService::new(&store)
            .create(create("Cholula", StateId::new(7)))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { entity: "state", id: 7 }));
    }

    #[tokio::test]
    async fn test_rename_excludes_self() {
        let store = MemoryStore::new();
        let puebla = state(&store, "Puebla").await;
        let service = CityService::new(&store);
        let city = service.create(create("Cholula", puebla.id)).await.unwrap();

        let renamed = service
            .update(
                city.id,
                UpdateCityInput {
                    name: Some("CHOLULA".to_string()),
                    state_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "CHOLULA");
    }

    #[tokio::test]
    async fn test_move_checks_target_state() {
        let store = MemoryStore::new();
        let puebla = state(&store, "Puebla").await;
        let veracruz = state(&store, "Veracruz").await;
        let service = CityService::new(&store);
        let city = service.create(create("Córdoba", puebla.id)).await.unwrap();
        service.create(create("Cordoba", veracruz.id)).await.unwrap();

        let err = service
            .update(
                city.id,
                UpdateCityInput {
                    name: None,
                    state_id: Some(veracruz.id),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists { .. }));

        let err = service
            .update(
                city.id,
                UpdateCityInput {
                    name: None,
                    state_id: Some(StateId::new(50)),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { entity: "state", .. }));
    }

    #[tokio::test]
    async fn test_find_by_name_is_scoped() {
        let store = MemoryStore::new();
        let puebla = state(&store, "Puebla").await;
        let oaxaca = state(&store, "Oaxaca").await;
        let service = CityService::new(&store);
        let city = service.create(create("Tehuacán", puebla.id)).await.unwrap();

        assert_eq!(
            service.find_by_name(puebla.id, "tehuacan").await.unwrap(),
            Some(city)
        );
        assert!(
            service
                .find_by_name(oaxaca.id, "tehuacan")
                .await
                .unwrap()
                .is_none()
        );
    }
}
