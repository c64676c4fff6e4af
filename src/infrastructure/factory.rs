//! Database handle and repository construction.
//!
//! The process owns exactly one [`Database`]: it is opened at startup from
//! [`DatabaseConfig`], lent to the application state as repositories, and
//! closed explicitly after the server stops.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: `SQLite` URL (default: `sqlite:taskflow.db`).
//!   `sqlite::memory:` keeps everything in memory for the life of the process.
//!
//! # Example
//!
//! ```ignore
//! let config = DatabaseConfig::from_env();
//! let database = Database::open(&config).await?;
//! let repositories = database.repositories();
//! // ... serve requests ...
//! database.close().await;
//! ```

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use super::sqlite::{SqliteProjectRepository, SqliteTaskRepository, create_schema};
use super::{ProjectRepository, RepositoryError, TaskRepository};

/// Default database location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:taskflow.db";

const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for opening the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL.
    pub database_url: String,
}

impl DatabaseConfig {
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// A private in-memory database, used by tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_DATABASE_URL)
    }

    /// Reads `DATABASE_URL`, treating an empty or whitespace-only value as unset.
    #[must_use]
    pub fn from_env() -> Self {
        env::var("DATABASE_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map_or_else(Self::default, Self::new)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while opening the database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The URL could not be parsed into connection options.
    #[error("Invalid database URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connecting to the database failed.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Creating the tables failed.
    #[error("Schema creation failed: {0}")]
    Schema(#[from] RepositoryError),
}

// =============================================================================
// Database
// =============================================================================

/// Collection of repositories sharing one database handle.
#[derive(Clone)]
pub struct Repositories {
    pub project_repository: Arc<dyn ProjectRepository + Send + Sync>,
    pub task_repository: Arc<dyn TaskRepository + Send + Sync>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Repositories")
            .field("project_repository", &"Arc<dyn ProjectRepository>")
            .field("task_repository", &"Arc<dyn TaskRepository>")
            .finish()
    }
}

/// The open database.
///
/// Backed by a pool capped at a single connection, so statements from
/// concurrent requests are serialized by the pool. The connection is never
/// recycled, which keeps an in-memory database alive until [`Database::close`].
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if missing) the database and ensures both tables exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the URL is invalid, the connection fails,
    /// or the schema cannot be created.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|error| DatabaseError::InvalidUrl {
                url: config.database_url.clone(),
                reason: error.to_string(),
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|error| DatabaseError::Connection(error.to_string()))?;

        create_schema(&pool).await?;

        tracing::info!(database_url = %config.database_url, "Database opened");

        Ok(Self { pool })
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates repositories backed by this database.
    #[must_use]
    pub fn repositories(&self) -> Repositories {
        Repositories {
            project_repository: Arc::new(SqliteProjectRepository::new(self.pool.clone())),
            task_repository: Arc::new(SqliteTaskRepository::new(self.pool.clone())),
        }
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("Database closed");
    }
}

// =============================================================================
// Tests
// =============================================================================
