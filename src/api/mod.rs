//! API module for HTTP handlers.
//!
//! This module contains route definitions and request/response handlers.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod project;
pub mod query;
pub mod transaction;

use axum::Router;
use axum::routing::{get, patch};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use dto::{
    CreateProjectRequest, CreateTaskRequest, ProjectResponse, TaskResponse, UpdateTaskRequest,
};
pub use error::{ApiError, ApiErrorResponse, FieldError, ValidationError};
pub use handlers::{AppState, HealthResponse, create_task, health_check};
pub use project::{create_project, list_projects};
pub use query::{ListTasksQuery, list_tasks};
pub use transaction::{delete_task, update_task};

/// Builds the application router.
///
/// CORS mirrors the request origin and allows credentials, so any browser
/// front end can call the API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Projects
        .route("/projects", get(list_projects).post(create_project))
        // Tasks
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", patch(update_task).delete(delete_task))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    use crate::infrastructure::{Database, DatabaseConfig};

    async fn app() -> Router {
        let database = Database::open(&DatabaseConfig::in_memory()).await.unwrap();
        router(AppState::from_repositories(database.repositories()))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn test_health() {
        let response = app()
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"ok": true}));
    }

    #[rstest]
    #[tokio::test]
    async fn test_cors_mirrors_origin() {
        let response = app()
            .await
            .oneshot(
                Request::get("/projects")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_invalid_json_body() {
        let response = app()
            .await
            .oneshot(
                Request::post("/projects")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_JSON");
    }

    #[rstest]
    #[case("/tasks/abc")]
    #[case("/tasks/1.5")]
    #[tokio::test]
    async fn test_non_numeric_task_id(#[case] uri: &str) {
        let response = app()
            .await
            .oneshot(Request::delete(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_PATH");
    }

    #[rstest]
    #[tokio::test]
    async fn test_repeated_query_parameter() {
        let response = app()
            .await
            .oneshot(
                Request::get("/tasks?status=DONE&status=TODO")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "INVALID_QUERY");
    }

    #[rstest]
    #[tokio::test]
    async fn test_unknown_route() {
        let response = app()
            .await
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
