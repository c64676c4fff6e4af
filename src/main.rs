//! Taskflow API server.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: `SQLite` connection URL (default: `sqlite:taskflow.db`)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `taskflow_api=debug`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `5050`)

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskflow_api::api::{self, AppState};
use taskflow_api::infrastructure::{Database, DatabaseConfig};
use taskflow_api::server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Taskflow API");

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    let database_config = DatabaseConfig::from_env();
    let database = match Database::open(&database_config).await {
        Ok(database) => database,
        Err(error) => {
            tracing::error!("Failed to open database: {}", error);
            std::process::exit(1);
        }
    };

    let application = api::router(AppState::from_repositories(database.repositories()));

    let result = Server::new(server_config).run(application).await;

    database.close().await;

    if let Err(error) = result {
        tracing::error!("Server error: {}", error);
        std::process::exit(1);
    }
}
