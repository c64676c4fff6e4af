//! Repository traits for domain entities.
//!
//! Handlers depend on these traits only; the SQLite implementations live in
//! [`super::sqlite`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewProject, NewTask, Project, ProjectId, Task, TaskId};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Entity was not found.
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// A row referenced a parent that does not exist.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database connection or statement error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored row could not be turned back into a domain value.
    #[error("Corrupted row: {0}")]
    CorruptedRow(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => Self::NotFound(error.to_string()),
            sqlx::Error::Database(database_error) if database_error.is_foreign_key_violation() => {
                Self::ForeignKeyViolation(database_error.message().to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::CorruptedRow(error.to_string())
            }
            _ => Self::DatabaseError(error.to_string()),
        }
    }
}

// =============================================================================
// Task Filter
// =============================================================================

/// Restriction on the project of listed tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectScope {
    /// Tasks of every project.
    #[default]
    Any,
    /// Tasks of one project.
    Only(ProjectId),
    /// A project reference no row can have, such as a fractional id.
    Unmatched,
}

/// Optional filters for task listing.
///
/// `status` is kept as the raw string the caller supplied: it is compared for
/// exact equality, so a value naming no status simply matches no rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub project: ProjectScope,
    pub status: Option<String>,
}

impl TaskFilter {
    #[must_use]
    pub const fn all() -> Self {
        Self {
            project: ProjectScope::Any,
            status: None,
        }
    }

    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project = ProjectScope::Only(project_id);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

// =============================================================================
// Project Repository
// =============================================================================

/// Repository trait for Project entities.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Lists all projects, most recently created (highest id) first.
    async fn list(&self) -> Result<Vec<Project>, RepositoryError>;

    /// Inserts a project and returns the stored row.
    async fn create(&self, project: &NewProject) -> Result<Project, RepositoryError>;

    /// Deletes a project and, through the cascade, all of its tasks.
    ///
    /// Returns `Ok(true)` if the project was deleted, `Ok(false)` if it didn't exist.
    async fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError>;
}

// =============================================================================
// Task Repository
// =============================================================================

/// Repository trait for Task entities.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists tasks matching `filter`, highest id first.
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, RepositoryError>;

    /// Inserts a task and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKeyViolation` if the project does not exist.
    async fn create(&self, task: &NewTask) -> Result<Task, RepositoryError>;

    /// Finds a task by its ID.
    ///
    /// Returns `Ok(Some(task))` if found, `Ok(None)` if not found,
    /// or an error if the operation fails.
    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, RepositoryError>;

    /// Overwrites the mutable fields of an existing task and returns the stored row.
    ///
    /// Last write wins: no version check is performed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no task has the given ID.
    async fn update(&self, task: &Task) -> Result<Task, RepositoryError>;

    /// Deletes a task by its ID.
    ///
    /// Returns `Ok(true)` if the task was deleted, `Ok(false)` if it didn't exist.
    async fn delete(&self, id: TaskId) -> Result<bool, RepositoryError>;
}

// =============================================================================
// Tests
// =============================================================================
