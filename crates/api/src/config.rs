//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (postgres backend)
//! - `DIRECTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `DIRECTORY_STORE` - `postgres` (default) or `memory`
//! - `DIRECTORY_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `DIRECTORY_HOST` - Bind address (default: 127.0.0.1)
//! - `DIRECTORY_PORT` - Listen port (default: 3000)
//! - `LOG_FORMAT` - `text` (default) or `json`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which [`Store`](crate::db::Store) backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store '{other}' (expected postgres or memory)")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

/// `PostgreSQL` settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection URL (contains password)
    pub url: SecretString,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

/// Directory service configuration.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Selected store backend
    pub store: StoreBackend,
    /// Database settings, present when `store` is `Postgres`
    pub database: Option<DatabaseConfig>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl DirectoryConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let store: StoreBackend = env.parse_or("DIRECTORY_STORE", StoreBackend::default())?;
        let database = match store {
            StoreBackend::Postgres => Some(DatabaseConfig {
                url: env.database_url("DIRECTORY_DATABASE_URL")?,
                max_connections: env
                    .parse_or("DIRECTORY_DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            }),
            StoreBackend::Memory => None,
        };

        let host = env.parse_or("DIRECTORY_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("DIRECTORY_PORT", 3000_u16)?;
        let log_format = env.parse_or("LOG_FORMAT", LogFormat::default())?;

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env.parse_or("SENTRY_SAMPLE_RATE", 1.0_f32)?;
        let sentry_traces_sample_rate = env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 1.0_f32)?;

        Ok(Self {
            store,
            database,
            host,
            port,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Parse a variable, or use `default` when it is unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Get database URL with fallback to generic `DATABASE_URL`.
    fn database_url(&self, primary_key: &str) -> Result<SecretString, ConfigError> {
        self.optional(primary_key)
            .or_else(|| self.optional("DATABASE_URL"))
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
    }
}
