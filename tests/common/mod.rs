//! Common test helpers for integration tests.
//!
//! Each test spawns the full router on an ephemeral loopback port, backed by
//! its own in-memory `SQLite` database.

#![allow(dead_code)]

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::net::TcpListener;

use taskflow_api::api::{self, AppState};
use taskflow_api::client::TaskflowClient;
use taskflow_api::infrastructure::{Database, DatabaseConfig};
use taskflow_api::server;

// =============================================================================
// Test Server
// =============================================================================

pub struct TestServer {
    pub base_url: String,
    pub database: Database,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let database = Database::open(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to open in-memory database");
        let router = api::router(AppState::from_repositories(database.repositories()));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Failed to read local address");

        tokio::spawn(server::serve(listener, router, std::future::pending()));

        Self {
            base_url: format!("http://{address}"),
            database,
        }
    }

    pub fn client(&self) -> TaskflowClient {
        TaskflowClient::new(&self.base_url)
    }

    pub fn raw(&self) -> TestClient {
        TestClient::new(&self.base_url)
    }
}

// =============================================================================
// Raw HTTP Client
// =============================================================================

pub struct TestClient {
    base_url: String,
    http_client: Client,
}

impl TestClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            http_client: Client::new(),
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(response).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> TestResponse {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(response).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to send POST request");
        TestResponse::from_response(response).await
    }

    pub async fn patch<T: Serialize>(&self, path: &str, body: &T) -> TestResponse {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .patch(&url)
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");
        TestResponse::from_response(response).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .expect("Failed to send DELETE request");
        TestResponse::from_response(response).await
    }

    pub async fn get_with_origin(&self, path: &str, origin: &str) -> TestResponse {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .header("Origin", origin)
            .send()
            .await
            .expect("Failed to send GET request");
        TestResponse::from_response(response).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: JsonValue,
    pub headers: reqwest::header::HeaderMap,
}

impl TestResponse {
    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .json::<JsonValue>()
            .await
            .unwrap_or(JsonValue::Null);
        Self {
            status,
            body,
            headers,
        }
    }

    pub fn error_fields(&self) -> Vec<String> {
        self.body["details"]
            .as_array()
            .map(|details| {
                details
                    .iter()
                    .filter_map(|detail| detail["field"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
