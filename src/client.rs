//! HTTP client for the Taskflow API.
//!
//! Each method performs exactly one request and returns the parsed body.
//! Transport failures and non-2xx responses surface as [`reqwest::Error`]
//! without interpretation of the error envelope.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::api::{
    CreateProjectRequest, CreateTaskRequest, HealthResponse, ListTasksQuery, ProjectResponse,
    TaskResponse, UpdateTaskRequest,
};

/// Thin wrapper around [`reqwest::Client`] bound to one API base URL.
#[derive(Debug, Clone)]
pub struct TaskflowClient {
    base_url: String,
    client: Client,
}

impl TaskflowClient {
    /// Creates a client for the API at `base_url`, e.g. `http://localhost:5050`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Creates a client that sends requests through an existing `reqwest` client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> reqwest::Result<T> {
        response.error_for_status()?.json().await
    }

    /// `GET /health`
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] on network or non-2xx failure.
    pub async fn health(&self) -> reqwest::Result<HealthResponse> {
        Self::parse(self.client.get(self.url("/health")).send().await?).await
    }

    /// `GET /projects`
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] on network or non-2xx failure.
    pub async fn fetch_projects(&self) -> reqwest::Result<Vec<ProjectResponse>> {
        Self::parse(self.client.get(self.url("/projects")).send().await?).await
    }

    /// `POST /projects`
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] on network or non-2xx failure,
    /// including a rejected name.
    pub async fn create_project(
        &self,
        name: impl Into<String>,
    ) -> reqwest::Result<ProjectResponse> {
        let request = CreateProjectRequest::new(name);
        Self::parse(
            self.client
                .post(self.url("/projects"))
                .json(&request)
                .send()
                .await?,
        )
        .await
    }

    /// `GET /tasks`, optionally filtered by project and status.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] on network or non-2xx failure.
    pub async fn fetch_tasks(&self, query: &ListTasksQuery) -> reqwest::Result<Vec<TaskResponse>> {
        Self::parse(
            self.client
                .get(self.url("/tasks"))
                .query(query)
                .send()
                .await?,
        )
        .await
    }

    /// `POST /tasks`
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] on network or non-2xx failure.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> reqwest::Result<TaskResponse> {
        Self::parse(
            self.client
                .post(self.url("/tasks"))
                .json(request)
                .send()
                .await?,
        )
        .await
    }

    /// `PATCH /tasks/{id}`
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] on network or non-2xx failure.
    pub async fn update_task(
        &self,
        id: i64,
        request: &UpdateTaskRequest,
    ) -> reqwest::Result<TaskResponse> {
        Self::parse(
            self.client
                .patch(self.url(&format!("/tasks/{id}")))
                .json(request)
                .send()
                .await?,
        )
        .await
    }

    /// `DELETE /tasks/{id}`
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] on network or non-2xx failure.
    pub async fn delete_task(&self, id: i64) -> reqwest::Result<()> {
        self.client
            .delete(self.url(&format!("/tasks/{id}")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
