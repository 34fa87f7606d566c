//! State service.

use tracing::{info, instrument};

use client_directory_core::{StateId, normalize};

use super::{DirectoryError, on_existing, on_named_write, require_name};
use crate::db::Store;
use crate::models::{
    CreateStateInput, NewState, State, StateChanges, StateWithCities, UpdateStateInput,
};

const ENTITY: &str = "state";

/// States: names unique across the whole directory.
pub struct StateService<'a> {
    store: &'a dyn Store,
}

impl<'a> StateService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Fetch a state.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no state has this id.
    pub async fn by_id(&self, id: StateId) -> Result<State, DirectoryError> {
        self.store
            .state_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::not_found(ENTITY, id))
    }

    /// Fetch a state with its cities.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if no state has this id.
    pub async fn find_one(&self, id: StateId) -> Result<StateWithCities, DirectoryError> {
        let state = self.by_id(id).await?;
        let cities = self.store.cities_in_state(id).await?;
        Ok(StateWithCities { state, cities })
    }

    /// All states, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn find_all(&self) -> Result<Vec<State>, DirectoryError> {
        Ok(self.store.list_states().await?)
    }

    /// Find the state whose name is equivalent to `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<State>, DirectoryError> {
        Ok(self.store.state_by_name_key(&normalize(name)).await?)
    }

    /// Create a state.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidInput` for a blank name and
    /// `DirectoryError::AlreadyExists` if an equivalent name is taken.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: CreateStateInput) -> Result<State, DirectoryError> {
        let name = require_name(input.name)?;

        if self.store.state_by_name_key(name.key()).await?.is_some() {
            return Err(DirectoryError::already_exists(ENTITY, name.as_str()));
        }

        let new = NewState { name };
        let state = self
            .store
            .insert_state(&new)
            .await
            .map_err(on_named_write(ENTITY, new.name.as_str()))?;

        info!(state_id = %state.id, "Created state");
        Ok(state)
    }

    /// Rename a state.
    ///
    /// Renaming a state to a name equivalent to its own is allowed.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the state does not exist and
    /// `DirectoryError::AlreadyExists` if another state has an equivalent
    /// name.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: StateId,
        input: UpdateStateInput,
    ) -> Result<State, DirectoryError> {
        let current = self.by_id(id).await?;
        let Some(name) = input.name.map(require_name).transpose()? else {
            return Ok(current);
        };

        if let Some(existing) = self.store.state_by_name_key(name.key()).await?
            && existing.id != id
        {
            return Err(DirectoryError::already_exists(ENTITY, name.as_str()));
        }

        let display = name.as_str().to_string();
        let changes = StateChanges { name: Some(name) };
        let state = self
            .store
            .update_state(id, &changes)
            .await
            .map_err(on_named_write(ENTITY, &display))?;

        info!(state_id = %id, "Updated state");
        Ok(state)
    }

    /// Delete a state that no city references.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::NotFound` if the state does not exist and a
    /// `Conflict` repository error while cities still reference it.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: StateId) -> Result<State, DirectoryError> {
        self.by_id(id).await?;
        let state = self
            .store
            .delete_state(id)
            .await
            .map_err(on_existing(ENTITY, id.as_i32()))?;

        info!(state_id = %id, "Deleted state");
        Ok(state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, RepositoryError};
    use crate::models::CreateCityInput;
    use crate::services::CityService;

    fn create(name: &str) -> CreateStateInput {
        CreateStateInput {
            name: name.to_string(),
        }
    }

    fn rename(name: &str) -> UpdateStateInput {
        UpdateStateInput {
            name: Some(name.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_stores_name_verbatim() {
        let store = MemoryStore::new();
        let service = StateService::new(&store);

        let state = service.create(create("Púebla")).await.unwrap();
        assert_eq!(state.name, "Púebla");
        assert_eq!(service.by_id(state.id).await.unwrap().name, "Púebla");
    }

    #[tokio::test]
    async fn test_create_rejects_equivalent_name() {
        let store = MemoryStore::new();
        let service = StateService::new(&store);
        service.create(create("Puebla")).await.unwrap();

        for dup in ["puebla", "PUEBLA", "Púebla"] {
            let err = service.create(create(dup)).await.unwrap_err();
            assert!(
                matches!(err, DirectoryError::AlreadyExists { entity: "state", .. }),
                "{dup}"
            );
        }
        assert_eq!(service.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let store = MemoryStore::new();
        let err = StateService::new(&store)
            .create(create(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let store = MemoryStore::new();
        let service = StateService::new(&store);
        let id = StateId::new(999);

        for err in [
            service.by_id(id).await.unwrap_err(),
            service.find_one(id).await.unwrap_err(),
            service.update(id, rename("X")).await.unwrap_err(),
            service.remove(id).await.unwrap_err(),
        ] {
            assert!(matches!(err, DirectoryError::NotFound { entity: "state", id: 999 }));
        }
    }

    #[tokio::test]
    async fn test_rename_to_own_name_succeeds() {
        let store = MemoryStore::new();
        let service = StateService::new(&store);
        let state = service.create(create("Puebla")).await.unwrap();

        let renamed = service.update(state.id, rename("PUEBLA")).await.unwrap();
        assert_eq!(renamed.name, "PUEBLA");
    }

    #[tokio::test]
    async fn test_rename_to_other_state_name_conflicts() {
        let store = MemoryStore::new();
        let service = StateService::new(&store);
        service.create(create("Puebla")).await.unwrap();
        let oaxaca = service.create(create("Oaxaca")).await.unwrap();

        let err = service.update(oaxaca.id, rename("puebla")).await.unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_empty_update_returns_current() {
        let store = MemoryStore::new();
        let service = StateService::new(&store);
        let state = service.create(create("Puebla")).await.unwrap();

        let same = service
            .update(state.id, UpdateStateInput::default())
            .await
            .unwrap();
        assert_eq!(same, state);
    }

    #[tokio::test]
    async fn test_find_one_and_restricted_remove() {
        let store = MemoryStore::new();
        let service = StateService::new(&store);
        let state = service.create(create("Puebla")).await.unwrap();
        let city = CityService::new(&store)
            .create(CreateCityInput {
                name: "Cholula".to_string(),
                state_id: state.id,
            })
            .await
            .unwrap();

        let detail = service.find_one(state.id).await.unwrap();
        assert_eq!(detail.cities, vec![city.clone()]);

        let err = service.remove(state.id).await.unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Repository(RepositoryError::Conflict(_))
        ));

        CityService::new(&store).remove(city.id).await.unwrap();
        assert_eq!(service.remove(state.id).await.unwrap(), state);
        assert!(service.find_by_name("puebla").await.unwrap().is_none());
    }
}
