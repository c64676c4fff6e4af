//! Infrastructure module for external services.
//!
//! This module contains the database handle and the repositories built on it.

pub mod factory;
pub mod repository;
pub mod sqlite;

pub use factory::{Database, DatabaseConfig, DatabaseError, Repositories};
pub use repository::{
    ProjectRepository, ProjectScope, RepositoryError, TaskFilter, TaskRepository,
};
pub use sqlite::{SqliteProjectRepository, SqliteTaskRepository};
