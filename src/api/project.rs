//! Project handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use super::dto::{CreateProjectRequest, ProjectResponse, validate_project_name};
use super::error::{ApiErrorResponse, ValidationError};
use super::handlers::AppState;
use crate::domain::{NewProject, Timestamp};

// =============================================================================
// GET /projects
// =============================================================================

/// Lists all projects, most recently created first.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] (500) if the repository operation fails.
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, ApiErrorResponse> {
    let projects = state.project_repository.list().await?;

    Ok(Json(projects.iter().map(ProjectResponse::from).collect()))
}

// =============================================================================
// POST /projects
// =============================================================================

/// Creates a project.
///
/// # Request Body
///
/// ```json
/// { "name": "Launch" }
/// ```
///
/// # Response
///
/// - **201 Created**: the stored project
/// - **400 Bad Request**: `name` missing, empty, or longer than 80 characters
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] on validation failure (400) or repository
/// failure (500). Nothing is written when validation fails.
pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiErrorResponse> {
    let Json(request) = payload?;

    let new_project = validate_create_project(&request, Timestamp::now())?;

    let project = state.project_repository.create(&new_project).await?;

    tracing::debug!(project_id = %project.project_id, "Project created");

    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

fn validate_create_project(
    request: &CreateProjectRequest,
    now: Timestamp,
) -> Result<NewProject, ValidationError> {
    let name = validate_project_name(request.name.as_deref())
        .map_err(|error| ValidationError::new(vec![error]))?;

    Ok(NewProject {
        name,
        created_at: now,
    })
}

// =============================================================================
// Tests
// =============================================================================
