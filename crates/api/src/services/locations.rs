//! Location service.

use tracing::{info, instrument};

use client_directory_core::{CityId, LocationId, normalize};

use super::{CityService, DirectoryError, on_existing, on_named_write, require_name};
use crate::db::{RepositoryError, Store};
use crate::models::{
    CreateLocationInput, Location, LocationChanges, LocationWithCity, NewLocation,
    UpdateLocationInput,
};

const ENTITY: &str = "location";

/// Locations: names unique within their city.
pub struct LocationService<'a> {
    store: &'a dyn Store,
}

impl<'a> LocationService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Fetch a location.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no location has this id.
    pub async fn by_id(&self, id: LocationId) -> Result<Location, DirectoryError> {
        self.store
            .location_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(ENTITY, id))
    }

    /// Fetch a location with its city.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no location has this id.
    pub async fn find_one(&self, id: LocationId) -> Result<LocationWithCity, DirectoryError> {
        let location = self.by_id(id).await?;
        let city = self.store.city_by_id(location.city_id).await?.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("location {id} has no city"))
        })?;
        Ok(LocationWithCity { location, city })
    }

    /// All locations, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn find_all(&self) -> Result<Vec<Location>, DirectoryError> {
        Ok(self.store.list_locations().await?)
    }

    /// Find the location in `city_id` whose name is equivalent to `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn find_by_name(
        &self,
        city_id: CityId,
        name: &str,
    ) -> Result<Option<Location>, DirectoryError> {
        Ok(self
            .store
            .location_by_name_key(city_id, &normalize(name))
            .await?)
    }

    /// Create a location in an existing city.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the city does not exist and
    /// `DirectoryError::AlreadyExists` if the city already has a location
    /// with an equivalent name.
    #[instrument(skip(self, input), fields(name = %input.name, city_id = %input.city_id))]
    pub async fn create(&self, input: CreateLocationInput) -> Result<Location, DirectoryError> {
        let name = require_name(input.name)?;
        CityService::new(self.store).by_id(input.city_id).await?;

        if self
            .store
            .location_by_name_key(input.city_id, name.key())
            .await?
            .is_some()
        {
            return Err(DirectoryError::already_exists(ENTITY, name.as_str()));
        }

        let new = NewLocation {
            name,
            city_id: input.city_id,
        };
        let location = self
            .store
            .insert_location(&new)
            .await
            .map_err(on_named_write(ENTITY, new.name.as_str()))?;

        info!(location_id = %location.id, "Created location");
        Ok(location)
    }

    /// Rename a location or move it to another city.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the location or the target city
    /// does not exist and `DirectoryError::AlreadyExists` on a name clash in
    /// the resulting city.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: LocationId,
        input: UpdateLocationInput,
    ) -> Result<Location, DirectoryError> {
        let current = self.by_id(id).await?;
        let name = input.name.map(require_name).transpose()?;

        if let Some(city_id) = input.city_id {
            CityService::new(self.store).by_id(city_id).await?;
        }

        let changes = LocationChanges {
            name,
            city_id: input.city_id,
        };
        if changes.name.is_none() && changes.city_id.is_none() {
            return Ok(current);
        }

        let scope = changes.city_id.unwrap_or(current.city_id);
        let (display, key) = changes.name.as_ref().map_or_else(
            || (current.name.clone(), normalize(&current.name)),
            |n| (n.as_str().to_string(), n.key().to_string()),
        );
        if let Some(existing) = self.store.location_by_name_key(scope, &key).await?
            && existing.id != id
        {
            return Err(DirectoryError::already_exists(ENTITY, display));
        }

        let location = self
            .store
            .update_location(id, &changes)
            .await
            .map_err(on_named_write(ENTITY, &display))?;

        info!(location_id = %id, city_id = %location.city_id, "Updated location");
        Ok(location)
    }

    /// Delete a location that no address references.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the location does not exist and
    /// a `Conflict` repository error while addresses still reference it.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: LocationId) -> Result<Location, DirectoryError> {
        self.by_id(id).await?;
        let location = self
            .store
            .delete_location(id)
            .await
            .map_err(on_existing(ENTITY, id.as_i32()))?;

        info!(location_id = %id, "Deleted location");
        Ok(location)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{City, CreateCityInput, CreateStateInput};
    use crate::services::StateService;

    async fn city(store: &MemoryStore, state: &str, name: &str) -> City {
        let states = StateService::new(store);
        let state = match states.find_by_name(state).await.unwrap() {
            Some(s) => s,
            None => states
                .create(CreateStateInput {
                    name: state.to_string(),
                })
                .await
                .unwrap(),
        };
        CityService::new(store)
            .create(CreateCityInput {
                name: name.to_string(),
                state_id: state.id,
            })
            .await
            .unwrap()
    }

    fn create(name: &str, city_id: CityId) -> CreateLocationInput {
        CreateLocationInput {
            name: name.to_string(),
            city_id,
        }
    }

    #[tokio::test]
    async fn test_names_unique_per_city() {
        let store = MemoryStore::new();
        let cholula = city(&store, "Puebla", "Cholula").await;
        let atlixco = city(&store, "Puebla", "Atlixco").await;
        let service = LocationService::new(&store);

        service.create(create("Centro", cholula.id)).await.unwrap();
        service.create(create("Centro", atlixco.id)).await.unwrap();

        let err = service
            .create(create("CENTRO", cholula.id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::AlreadyExists { entity: "location", .. }
        ));
    }

    #[tokio::test]
    async fn test_create_requires_city() {
        let store = MemoryStore::new();
        let err = LocationService::new(&store)
            .create(create("Centro", CityId::new(3)))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { entity: "city", id: 3 }));
    }

    #[tokio::test]
    async fn test_find_one_embeds_city() {
        let store = MemoryStore::new();
        let cholula = city(&store, "Puebla", "Cholula").await;
        let service = LocationService::new(&store);
        let location = service.create(create("San Pedro", cholula.id)).await.unwrap();

        let detail = service.find_one(location.id).await.unwrap();
        assert_eq!(detail.location, location);
        assert_eq!(detail.city, cholula);
    }

    #[tokio::test]
    async fn test_update_excludes_self_and_checks_scope() {
        let store = MemoryStore::new();
        let cholula = city(&store, "Puebla", "Cholula").await;
        let atlixco = city(&store, "Puebla", "Atlixco").await;
        let service = LocationService::new(&store);
        let centro = service.create(create("Centro", cholula.id)).await.unwrap();
        service.create(create("Centro", atlixco.id)).await.unwrap();

        let renamed = service
            .update(
                centro.id,
                UpdateLocationInput {
                    name: Some("Céntro".to_string()),
                    city_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Céntro");

        let err = service
            .update(
                centro.id,
                UpdateLocationInput {
                    name: None,
                    city_id: Some(atlixco.id),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists { .. }));
    }
}
