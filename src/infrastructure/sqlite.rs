//! `SQLite` repository implementations.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE projects (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     name TEXT NOT NULL,
//!     created_at TEXT NOT NULL
//! );
//!
//! CREATE TABLE tasks (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     project_id INTEGER NOT NULL,
//!     title TEXT NOT NULL,
//!     description TEXT,
//!     status TEXT NOT NULL DEFAULT 'TODO',
//!     created_at TEXT NOT NULL,
//!     updated_at TEXT NOT NULL,
//!     FOREIGN KEY(project_id) REFERENCES projects(id) ON DELETE CASCADE
//! );
//! ```
//!
//! Timestamps are supplied by the caller rather than by column defaults so
//! that they keep sub-second precision.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::domain::{
    NewProject, NewTask, Project, ProjectId, Task, TaskId, TaskStatus, Timestamp,
};
use crate::infrastructure::{
    ProjectRepository, ProjectScope, RepositoryError, TaskFilter, TaskRepository,
};

const CREATE_PROJECTS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

const CREATE_TASKS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'TODO',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY(project_id) REFERENCES projects(id) ON DELETE CASCADE
)";

const PROJECT_COLUMNS: &str = "id, name, created_at";

const TASK_COLUMNS: &str = "id, project_id, title, description, status, created_at, updated_at";

/// Creates both tables if they do not exist yet.
///
/// # Errors
///
/// Returns `RepositoryError::DatabaseError` if a statement fails.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::query(CREATE_PROJECTS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_TASKS_TABLE).execute(pool).await?;
    Ok(())
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            project_id: ProjectId::new(row.id),
            name: row.name,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i64,
    project_id: i64,
    title: String,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = RepositoryError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status: TaskStatus = row
            .status
            .parse()
            .map_err(|error| RepositoryError::CorruptedRow(format!("task {}: {error}", row.id)))?;

        Ok(Self {
            task_id: TaskId::new(row.id),
            project_id: ProjectId::new(row.project_id),
            title: row.title,
            description: row.description,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

// =============================================================================
// SQLite Project Repository
// =============================================================================

/// `SQLite` implementation of `ProjectRepository`.
#[derive(Debug, Clone)]
pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let rows: Vec<ProjectRow> =
            sqlx::query_as(&format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id DESC"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn create(&self, project: &NewProject) -> Result<Project, RepositoryError> {
        let row: ProjectRow = sqlx::query_as(&format!(
            "INSERT INTO projects (name, created_at) VALUES (?, ?) RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(project.name.as_str())
        .bind(project.created_at.into_datetime())
        .fetch_one(&self.pool)
        .await?;

        Ok(Project::from(row))
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// SQLite Task Repository
// =============================================================================

/// `SQLite` implementation of `TaskRepository`.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, RepositoryError> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1 = 1"));

        match filter.project {
            ProjectScope::Any => {}
            ProjectScope::Only(project_id) => {
                builder.push(" AND project_id = ").push_bind(project_id.as_i64());
            }
            ProjectScope::Unmatched => {
                builder.push(" AND 0 = 1");
            }
        }
        if let Some(status) = &filter.status {
            builder.push(" AND status = ").push_bind(status.clone());
        }
        builder.push(" ORDER BY id DESC");

        let rows: Vec<TaskRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn create(&self, task: &NewTask) -> Result<Task, RepositoryError> {
        let row: TaskRow = sqlx::query_as(&format!(
            "INSERT INTO tasks (project_id, title, description, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.project_id.as_i64())
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.created_at.into_datetime())
        .bind(task.created_at.into_datetime())
        .fetch_one(&self.pool)
        .await?;

        Task::try_from(row)
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, RepositoryError> {
        let row: Option<TaskRow> =
            sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Task::try_from).transpose()
    }

    async fn update(&self, task: &Task) -> Result<Task, RepositoryError> {
        let row: Option<TaskRow> = sqlx::query_as(&format!(
            "UPDATE tasks SET title = ?, description = ?, status = ?, updated_at = ? \
             WHERE id = ? RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.updated_at.into_datetime())
        .bind(task.task_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from)
            .transpose()?
            .ok_or_else(|| RepositoryError::NotFound(format!("task {}", task.task_id)))
    }

    async fn delete(&self, id: TaskId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
