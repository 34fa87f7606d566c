//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cdir-cli migrate
//! ```
//!
//! Migrations live in `crates/api/migrations/` and are embedded at build
//! time.

use client_directory_api::db;
use thiserror::Error;

use super::{CommandError, database_url};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to directory database...");
    let pool = db::create_pool(&database_url, 1).await?;

    tracing::info!("Running directory migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Directory migrations complete!");
    Ok(())
}
