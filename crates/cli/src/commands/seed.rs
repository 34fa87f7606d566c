//! Seed the directory with states, cities and locations from a YAML file.
//!
//! # Catalog Format
//!
//! ```yaml
//! states:
//!   - name: Puebla
//!     cities:
//!       - name: San Andrés Cholula
//!         locations:
//!           - Tlaxcalancingo
//!           - San Bernardino
//! ```
//!
//! Every entry goes through the directory services, so names are checked the
//! same way as over HTTP. Entries whose name already exists at their scope
//! (ignoring case and accents) are reused, which makes seeding idempotent.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use client_directory_api::db::{self, PgStore, Store};
use client_directory_api::models::{CreateCityInput, CreateLocationInput, CreateStateInput};
use client_directory_api::services::{
    CityService, DirectoryError, LocationService, StateService,
};

use super::{CommandError, database_url};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Top-level catalog document.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub states: Vec<StateEntry>,
}

#[derive(Debug, Deserialize)]
pub struct StateEntry {
    pub name: String,
    #[serde(default)]
    pub cities: Vec<CityEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CityEntry {
    pub name: String,
    #[serde(default)]
    pub locations: Vec<String>,
}

/// Rows created versus reused by a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub skipped: usize,
}

impl SeedSummary {
    const fn record(&mut self, created: bool) {
        if created {
            self.created += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Seed the database from the catalog at `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the database is
/// unreachable, or the directory rejects an entry.
pub async fn catalog(file_path: &str) -> Result<SeedSummary, SeedError> {
    let database_url = database_url()?;

    info!(path = %file_path, "Loading catalog");
    let content = tokio::fs::read_to_string(Path::new(file_path))
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.to_string(),
            source,
        })?;
    let catalog: Catalog = serde_yaml::from_str(&content)?;
    info!(states = catalog.states.len(), "Parsed catalog");

    let pool = db::create_pool(&database_url, 2).await?;
    let store = PgStore::new(pool);

    let summary = seed(&store, &catalog).await?;

    info!("Seeding complete!");
    info!("  Rows created: {}", summary.created);
    info!("  Rows skipped (already exist): {}", summary.skipped);
    Ok(summary)
}

/// Load `catalog` into `store`, reusing rows that already exist.
///
/// # Errors
///
/// Returns the first error raised by the directory services.
pub async fn seed(store: &dyn Store, catalog: &Catalog) -> Result<SeedSummary, SeedError> {
    let states = StateService::new(store);
    let cities = CityService::new(store);
    let locations = LocationService::new(store);
    let mut summary = SeedSummary::default();

    for state_entry in &catalog.states {
        let (state, created) = match states.find_by_name(&state_entry.name).await? {
            Some(existing) => (existing, false),
            None => {
                let input = CreateStateInput {
                    name: state_entry.name.clone(),
                };
                (states.create(input).await?, true)
            }
        };
        summary.record(created);

        for city_entry in &state_entry.cities {
            let (city, created) = match cities.find_by_name(state.id, &city_entry.name).await? {
                Some(existing) => (existing, false),
                None => {
                    let input = CreateCityInput {
                        name: city_entry.name.clone(),
                        state_id: state.id,
                    };
                    (cities.create(input).await?, true)
                }
            };
            summary.record(created);

            for location_name in &city_entry.locations {
                if locations
                    .find_by_name(city.id, location_name)
                    .await?
                    .is_some()
                {
                    summary.record(false);
                    continue;
                }
                let input = CreateLocationInput {
                    name: location_name.clone(),
                    city_id: city.id,
                };
                locations.create(input).await?;
                summary.record(true);
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use client_directory_api::db::MemoryStore;

    use super::*;

    const CATALOG: &str = r"
states:
  - name: Puebla
    cities:
      - name: San Andrés Cholula
        locations:
          - Tlaxcalancingo
          - San Bernardino
      - name: Atlixco
  - name: Veracruz
    cities:
      - name: Córdoba
";

    #[test]
    fn test_parse_catalog() {
        let catalog: Catalog = serde_yaml::from_str(CATALOG).unwrap();
        assert_eq!(catalog.states.len(), 2);
        assert_eq!(catalog.states[0].cities[0].locations.len(), 2);
        assert!(catalog.states[0].cities[1].locations.is_empty());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = MemoryStore::new();
        let catalog: Catalog = serde_yaml::from_str(CATALOG).unwrap();

        let first = seed(&store, &catalog).await.unwrap();
        assert_eq!(
            first,
            SeedSummary {
                created: 7,
                skipped: 0
            }
        );

        let second = seed(&store, &catalog).await.unwrap();
        assert_eq!(
            second,
            SeedSummary {
                created: 0,
                skipped: 7
            }
        );
    }

    #[tokio::test]
    async fn test_seed_matches_existing_names_loosely() {
        let store = MemoryStore::new();
        let existing = r"
states:
  - name: PUEBLA
    cities:
      - name: san andres cholula
";
        seed(&store, &serde_yaml::from_str(existing).unwrap())
            .await
            .unwrap();

        let summary = seed(&store, &serde_yaml::from_str(CATALOG).unwrap())
            .await
            .unwrap();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.created, 5);

        let states = StateService::new(&store).find_all().await.unwrap();
        assert_eq!(states[0].name, "PUEBLA");
    }
}
