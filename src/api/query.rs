//! Task listing.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};

use super::dto::{TaskResponse, whole_number};
use super::error::ApiErrorResponse;
use super::handlers::AppState;
use crate::domain::ProjectId;
use crate::infrastructure::{ProjectScope, TaskFilter};

// =============================================================================
// Query Parameters
// =============================================================================

/// Query parameters for `GET /tasks`.
///
/// Both parameters are kept as raw strings: a `project_id` that is not a
/// number is ignored rather than rejected, and `status` is matched verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ListTasksQuery {
    /// Restricts the listing to one project.
    #[must_use]
    pub fn with_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id.to_string());
        self
    }

    /// Restricts the listing to one status value.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Converts the raw parameters into a repository filter.
    ///
    /// Empty values count as absent. A `project_id` that is not a number
    /// drops the project filter; a number that is not a whole `i64` (`1.5`,
    /// `1e20`) keeps it but matches nothing. A `status` that names no status
    /// is passed through and matches nothing.
    #[must_use]
    pub fn to_filter(&self) -> TaskFilter {
        let project = self
            .project_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or(ProjectScope::Any, project_scope);

        let status = self.status.clone().filter(|value| !value.is_empty());

        TaskFilter { project, status }
    }
}

fn project_scope(value: &str) -> ProjectScope {
    match value.parse::<f64>() {
        Ok(number) if !number.is_nan() => {
            whole_number(number).map_or(ProjectScope::Unmatched, |project_id| {
                ProjectScope::Only(ProjectId::new(project_id))
            })
        }
        _ => {
            tracing::debug!(project_id = value, "Ignoring non-numeric project_id filter");
            ProjectScope::Any
        }
    }
}

// =============================================================================
// GET /tasks - List Tasks
// =============================================================================

/// Lists tasks, highest id first, with optional filtering.
///
/// # Query Parameters
///
/// - `project_id`: Optional filter by project
/// - `status`: Optional filter by exact status value
///
/// # Response
///
/// - **200 OK**: array of tasks, possibly empty
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] in the following cases:
/// - **400 Bad Request**: Query string cannot be parsed (e.g. a repeated key)
/// - **500 Internal Server Error**: Repository operation failed
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let Query(query) = query?;
    let filter = query.to_filter();

    let tasks = state.task_repository.list(&filter).await?;

    Ok(Json(tasks.iter().map(TaskResponse::from).collect()))
}

// =============================================================================
// Tests
// =============================================================================
