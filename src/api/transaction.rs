//! Mutation of existing tasks.
//!
//! Updates read the current row, overlay the validated patch and write the
//! merged task back. The read and the write are separate statements, so two
//! concurrent patches of the same task resolve as last write wins.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use super::dto::{
    TaskResponse, UpdateTaskRequest, validate_description, validate_status, validate_title,
};
use super::error::{ApiErrorResponse, FieldError, ValidationError};
use super::handlers::AppState;
use crate::domain::{FieldUpdate, TaskId, TaskPatch, Timestamp};

// =============================================================================
// PATCH /tasks/{id}
// =============================================================================

/// Partially updates a task.
///
/// Only the keys present in the body are changed. `description: null`
/// clears the description; `null` for `title` or `status` is rejected.
/// `updated_at` is refreshed even when the body is `{}`.
///
/// # Response
///
/// - **200 OK**: the updated task
/// - **400 Bad Request**: malformed body or invalid field
/// - **404 Not Found**: no task with this id
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] as listed above, or 500 if the repository
/// operation fails. Validation happens before the task is looked up.
pub async fn update_task(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let Path(task_id) = path?;
    let Json(request) = payload?;

    let patch = validate_update_request(&request)?;

    let task = state
        .task_repository
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| ApiErrorResponse::not_found("Task not found"))?;

    let updated = state
        .task_repository
        .update(&task.apply(patch, Timestamp::now()))
        .await?;

    tracing::debug!(%task_id, status = %updated.status, "Task updated");

    Ok(Json(TaskResponse::from(updated)))
}

/// Checks a nullable request field that must not actually be `null`.
fn non_null<T>(
    errors: &mut ValidationError,
    field: &str,
    update: &FieldUpdate<Option<String>>,
    validate: impl FnOnce(&str) -> Result<T, FieldError>,
) -> FieldUpdate<T> {
    match update {
        FieldUpdate::Unchanged => FieldUpdate::Unchanged,
        FieldUpdate::Set(None) => {
            errors.push(field, "Must not be null");
            FieldUpdate::Unchanged
        }
        FieldUpdate::Set(Some(value)) => errors
            .check(validate(value.as_str()))
            .map_or(FieldUpdate::Unchanged, FieldUpdate::Set),
    }
}

fn validate_update_request(request: &UpdateTaskRequest) -> Result<TaskPatch, ValidationError> {
    let mut errors = ValidationError::default();

    let title = non_null(&mut errors, "title", &request.title, |title| {
        validate_title(Some(title))
    });
    let description = match &request.description {
        FieldUpdate::Unchanged => FieldUpdate::Unchanged,
        FieldUpdate::Set(description) => errors
            .check(validate_description(description.as_deref()))
            .map_or(FieldUpdate::Unchanged, FieldUpdate::Set),
    };
    let status = non_null(&mut errors, "status", &request.status, validate_status);

    errors.into_result(TaskPatch {
        title,
        description,
        status,
    })
}

// =============================================================================
// DELETE /tasks/{id}
// =============================================================================

/// Deletes a task.
///
/// # Response
///
/// - **204 No Content**: the task was deleted
/// - **404 Not Found**: no task with this id
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] as listed above, or 500 if the repository
/// operation fails.
pub async fn delete_task(
    State(state): State<AppState>,
    path: Result<Path<TaskId>, PathRejection>,
) -> Result<StatusCode, ApiErrorResponse> {
    let Path(task_id) = path?;

    if !state.task_repository.delete(task_id).await? {
        return Err(ApiErrorResponse::not_found("Task not found"));
    }

    tracing::debug!(%task_id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::api::dto::CreateTaskRequest;
    use crate::api::handlers::create_task;
    use crate::domain::{NewProject, TaskStatus};
    use crate::infrastructure::{Database, DatabaseConfig};

    async fn state() -> AppState {
        let database = Database::open(&DatabaseConfig::in_memory()).await.unwrap();
        AppState::from_repositories(database.repositories())
    }

    async fn seed_task(state: &AppState) -> TaskResponse {
        let project = state
            .project_repository
            .create(&NewProject {
                name: "Launch".to_string(),
                created_at: Timestamp::now(),
            })
            .await
            .unwrap();
        let request = CreateTaskRequest::new(project.project_id.as_i64(), "Write docs")
            .with_description("Draft");
        let (_, Json(task)) = create_task(State(state.clone()), Ok(Json(request)))
            .await
            .unwrap();
        task
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    #[rstest]
    fn test_validate_update_request_empty_body() {
        let patch = validate_update_request(&UpdateTaskRequest::default()).unwrap();
        assert!(patch.is_empty());
    }

    #[rstest]
    fn test_validate_update_request_null_description_clears() {
        let request = UpdateTaskRequest::default().with_description(None);

        let patch = validate_update_request(&request).unwrap();

        assert_eq!(patch.description, FieldUpdate::Set(None));
    }

    #[rstest]
    fn test_validate_update_request_rejects_null_title_and_status() {
        let request = UpdateTaskRequest {
            title: FieldUpdate::Set(None),
            description: FieldUpdate::Unchanged,
            status: FieldUpdate::Set(None),
        };

        let error = validate_update_request(&request).unwrap_err();

        let fields: Vec<&str> = error.errors.iter().map(|error| error.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "status"]);
    }

    #[rstest]
    #[case(UpdateTaskRequest::default().with_title(""), "title")]
    #[case(UpdateTaskRequest::default().with_title("x".repeat(121)), "title")]
    #[case(UpdateTaskRequest::default().with_description(Some("x".repeat(501))), "description")]
    #[case(
        UpdateTaskRequest {
            status: FieldUpdate::Set(Some("BLOCKED".to_string())),
            ..UpdateTaskRequest::default()
        },
        "status"
    )]
    fn test_validate_update_request_invalid_field(
        #[case] request: UpdateTaskRequest,
        #[case] field: &str,
    ) {
        let error = validate_update_request(&request).unwrap_err();
        assert_eq!(error.errors.len(), 1);
        assert_eq!(error.errors[0].field, field);
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    #[rstest]
    #[tokio::test]
    async fn test_update_task_status_only_keeps_other_fields() {
        let state = state().await;
        let created = seed_task(&state).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let Json(updated) = update_task(
            State(state),
            Ok(Path(TaskId::new(created.id))),
            Ok(Json(UpdateTaskRequest::default().with_status(TaskStatus::Done))),
        )
        .await
        .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_task_clears_description() {
        let state = state().await;
        let created = seed_task(&state).await;

        let Json(updated) = update_task(
            State(state),
            Ok(Path(TaskId::new(created.id))),
            Ok(Json(UpdateTaskRequest::default().with_description(None))),
        )
        .await
        .unwrap();

        assert!(updated.description.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_task_not_found() {
        let state = state().await;

        let error = update_task(
            State(state),
            Ok(Path(TaskId::new(999))),
            Ok(Json(UpdateTaskRequest::default().with_title("New title"))),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::NOT_FOUND);
        assert_eq!(error.error.message, "Task not found");
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_task_validates_before_lookup() {
        let state = state().await;

        let error = update_task(
            State(state),
            Ok(Path(TaskId::new(999))),
            Ok(Json(UpdateTaskRequest::default().with_title(""))),
        )
        .await
        .unwrap_err();

        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_task_then_not_found() {
        let state = state().await;
        let created = seed_task(&state).await;

        let status = delete_task(State(state.clone()), Ok(Path(TaskId::new(created.id))))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let error = delete_task(State(state), Ok(Path(TaskId::new(created.id))))
            .await
            .unwrap_err();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }
}
