//! HTTP handlers for the Taskflow API.
//!
//! Shared state, the health check and task creation live here; project
//! handlers are in [`super::project`], listing in [`super::query`] and
//! mutation of existing tasks in [`super::transaction`].

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::dto::{
    CreateTaskRequest, TaskResponse, validate_description, validate_project_id, validate_status,
    validate_title,
};
use super::error::{ApiErrorResponse, ValidationError};
use crate::domain::{NewTask, TaskStatus, Timestamp};
use crate::infrastructure::{ProjectRepository, Repositories, TaskRepository};

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// Holds the repositories handed out by the process-owned
/// [`Database`](crate::infrastructure::Database); cloning the state clones
/// the `Arc`s, not the storage handle.
#[derive(Clone)]
pub struct AppState {
    /// Project repository for project operations.
    pub project_repository: Arc<dyn ProjectRepository + Send + Sync>,
    /// Task repository for persistence.
    pub task_repository: Arc<dyn TaskRepository + Send + Sync>,
}

impl AppState {
    /// Creates a new `AppState` from initialized repositories.
    #[must_use]
    pub fn from_repositories(repositories: Repositories) -> Self {
        Self {
            project_repository: repositories.project_repository,
            task_repository: repositories.task_repository,
        }
    }
}

// =============================================================================
// POST /tasks Handler
// =============================================================================

/// Creates a new task.
///
/// # Request Body
///
/// ```json
/// {
///   "project_id": 1,
///   "title": "Task title",
///   "description": "Optional description",
///   "status": "TODO|IN_PROGRESS|DONE"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: Task created successfully
/// - **400 Bad Request**: Validation error, or the project does not exist
/// - **500 Internal Server Error**: Database error
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] in the following cases:
/// - Validation error (400 Bad Request): malformed body, invalid fields,
///   or unknown `project_id`
/// - Database error (500 Internal Server Error): Repository operation failed
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let Json(request) = payload?;

    let new_task = validate_create_request(&request, Timestamp::now())?;

    let task = state.task_repository.create(&new_task).await?;

    tracing::debug!(task_id = %task.task_id, project_id = %task.project_id, "Task created");

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Validates a create task request, reporting every invalid field at once.
///
/// A missing status defaults to [`TaskStatus::Todo`].
fn validate_create_request(
    request: &CreateTaskRequest,
    now: Timestamp,
) -> Result<NewTask, ValidationError> {
    let mut errors = ValidationError::default();

    let project_id = errors.check(validate_project_id(request.project_id.as_ref()));
    let title = errors.check(validate_title(request.title.as_deref()));
    let description = errors.check(validate_description(request.description.as_deref()));
    let status = errors.check(
        request
            .status
            .as_deref()
            .map_or(Ok(TaskStatus::default()), validate_status),
    );

    let (Some(project_id), Some(title), Some(description), Some(status)) =
        (project_id, title, description, status)
    else {
        return Err(errors);
    };

    Ok(NewTask {
        project_id,
        title,
        description,
        status,
        created_at: now,
    })
}

// =============================================================================
// GET /health Handler
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Health check endpoint.
///
/// # Response
///
/// - **200 OK**: `{"ok": true}`
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::domain::ProjectId;

    #[rstest]
    fn test_validate_create_request_valid() {
        let request = CreateTaskRequest::new(3, "Test Task")
            .with_description("Description")
            .with_status(TaskStatus::InProgress);
        let now = Timestamp::now();

        let validated = validate_create_request(&request, now).unwrap();

        assert_eq!(validated.project_id, ProjectId::new(3));
        assert_eq!(validated.title, "Test Task");
        assert_eq!(validated.description.as_deref(), Some("Description"));
        assert_eq!(validated.status, TaskStatus::InProgress);
        assert_eq!(validated.created_at, now);
    }

    #[rstest]
    fn test_validate_create_request_defaults_status_to_todo() {
        let request = CreateTaskRequest::new(1, "Test Task");

        let validated = validate_create_request(&request, Timestamp::now()).unwrap();

        assert_eq!(validated.status, TaskStatus::Todo);
        assert!(validated.description.is_none());
    }

    #[rstest]
    fn test_validate_create_request_reports_every_invalid_field() {
        let request = CreateTaskRequest {
            project_id: Some(0.into()),
            title: Some(String::new()),
            description: Some("a".repeat(501)),
            status: Some("BLOCKED".to_string()),
        };

        let error = validate_create_request(&request, Timestamp::now()).unwrap_err();

        let fields: Vec<&str> = error.errors.iter().map(|error| error.field.as_str()).collect();
        assert_eq!(fields, vec!["project_id", "title", "description", "status"]);
    }

    #[rstest]
    fn test_validate_create_request_missing_fields() {
        let error =
            validate_create_request(&CreateTaskRequest::default(), Timestamp::now()).unwrap_err();

        let fields: Vec<&str> = error.errors.iter().map(|error| error.field.as_str()).collect();
        assert_eq!(fields, vec!["project_id", "title"]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_health_check() {
        let Json(response) = health_check().await;
        assert!(response.ok);
    }
}
