//! Data Transfer Objects for API requests and responses.
//!
//! This module contains DTOs that are separate from domain models,
//! providing a clean API contract. The same types are used by
//! [`crate::client::TaskflowClient`] on the other side of the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::error::FieldError;
use crate::domain::{FieldUpdate, Project, ProjectId, Task, TaskStatus};

/// Maximum project name length, in characters.
pub const PROJECT_NAME_MAX_CHARS: usize = 80;

/// Maximum task title length, in characters.
pub const TASK_TITLE_MAX_CHARS: usize = 120;

/// Maximum task description length, in characters.
pub const TASK_DESCRIPTION_MAX_CHARS: usize = 500;

// =============================================================================
// Project DTOs
// =============================================================================

/// Request DTO for creating a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl CreateProjectRequest {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Response DTO for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.project_id.as_i64(),
            name: project.name.clone(),
            created_at: project.created_at.into_datetime(),
        }
    }
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self::from(&project)
    }
}

// =============================================================================
// Task DTOs
// =============================================================================

/// Request DTO for creating a new task.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a field-level validation error rather than a parse failure.
/// `project_id` is any JSON number; whole-number floats such as `1.0` are
/// accepted by [`validate_project_id`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub project_id: Option<Number>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// One of `TODO`, `IN_PROGRESS`, `DONE` (defaults to `TODO`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CreateTaskRequest {
    #[must_use]
    pub fn new(project_id: i64, title: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            title: Some(title.into()),
            description: None,
            status: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }
}

/// Request DTO for a partial task update.
///
/// A key that is absent from the body stays [`FieldUpdate::Unchanged`]; a key
/// present with `null` becomes `FieldUpdate::Set(None)`. Only `description`
/// accepts `null`; the validator rejects it for `title` and `status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub title: FieldUpdate<Option<String>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub description: FieldUpdate<Option<String>>,
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub status: FieldUpdate<Option<String>>,
}

impl UpdateTaskRequest {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = FieldUpdate::Set(Some(title.into()));
        self
    }

    /// Sets the description; `None` clears it.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = FieldUpdate::Set(description);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = FieldUpdate::Set(Some(status.as_str().to_string()));
        self
    }
}

/// Response DTO for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.task_id.as_i64(),
            project_id: task.project_id.as_i64(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            created_at: task.created_at.into_datetime(),
            updated_at: task.updated_at.into_datetime(),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a required, length-limited text field.
///
/// Strings are taken as-is: no trimming, and length counts characters.
fn validate_required_text(
    field: &str,
    label: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<String, FieldError> {
    let Some(value) = value else {
        return Err(FieldError::new(field, format!("{label} is required")));
    };

    if value.is_empty() {
        return Err(FieldError::new(field, format!("{label} must not be empty")));
    }

    if value.chars().count() > max_chars {
        return Err(FieldError::new(
            field,
            format!("{label} must not exceed {max_chars} characters"),
        ));
    }

    Ok(value.to_string())
}

/// Validates a project name.
///
/// # Validation Rules
///
/// - Name is required and must not be empty
/// - Name must not exceed 80 characters
///
/// # Errors
///
/// Returns a [`FieldError`] on `name` when a rule is violated.
pub fn validate_project_name(name: Option<&str>) -> Result<String, FieldError> {
    validate_required_text("name", "Name", name, PROJECT_NAME_MAX_CHARS)
}

/// Validates a task title.
///
/// # Validation Rules
///
/// - Title is required and must not be empty
/// - Title must not exceed 120 characters
///
/// # Errors
///
/// Returns a [`FieldError`] on `title` when a rule is violated.
pub fn validate_title(title: Option<&str>) -> Result<String, FieldError> {
    validate_required_text("title", "Title", title, TASK_TITLE_MAX_CHARS)
}

/// Validates a task description. `None` (absent or `null`) is accepted and
/// an empty string is kept as an empty string.
///
/// # Errors
///
/// Returns a [`FieldError`] on `description` if it exceeds 500 characters.
pub fn validate_description(description: Option<&str>) -> Result<Option<String>, FieldError> {
    match description {
        None => Ok(None),
        Some(description) if description.chars().count() > TASK_DESCRIPTION_MAX_CHARS => {
            Err(FieldError::new(
                "description",
                format!("Description must not exceed {TASK_DESCRIPTION_MAX_CHARS} characters"),
            ))
        }
        Some(description) => Ok(Some(description.to_string())),
    }
}

/// Validates a task status against the three known values.
///
/// # Errors
///
/// Returns a [`FieldError`] on `status` for any other value.
pub fn validate_status(status: &str) -> Result<TaskStatus, FieldError> {
    status.parse().map_err(|_| {
        FieldError::new(
            "status",
            "Status must be one of TODO, IN_PROGRESS, DONE",
        )
    })
}

/// Returns `value` as an `i64` if it is a whole number within range.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn whole_number(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then(|| value as i64)
}

/// Validates the project reference of a new task.
///
/// # Errors
///
/// Returns a [`FieldError`] on `project_id` if it is missing, fractional, or
/// not positive.
pub fn validate_project_id(project_id: Option<&Number>) -> Result<ProjectId, FieldError> {
    let Some(number) = project_id else {
        return Err(FieldError::new("project_id", "Project id is required"));
    };

    match number
        .as_i64()
        .or_else(|| number.as_f64().and_then(whole_number))
    {
        Some(value) if value > 0 => Ok(ProjectId::new(value)),
        _ => Err(FieldError::new(
            "project_id",
            "Project id must be a positive integer",
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================
