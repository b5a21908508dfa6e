//! Application setup and initialization
//!
//! Database, storage, gateway client, and route wiring, extracted from
//! main.rs for better organization.

pub mod routes;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};

use promptforge_core::Config;
use promptforge_db::SubmissionRepository;
use promptforge_gateway::{CompletionClient, HttpCompletionClient};
use promptforge_pipeline::SubmissionService;
use promptforge_storage::{LocalStorage, Storage};

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let pool = promptforge_db::connect_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    promptforge_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready");

    let repository = Arc::new(SubmissionRepository::new(pool));

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(config.storage_path.clone(), config.storage_base_url.clone())
            .await
            .context("Failed to initialize local storage")?,
    );

    if config.gateway.api_key.is_none() {
        tracing::warn!("GATEWAY_API_KEY is not set; submissions will fail until it is configured");
    }
    let client: Arc<dyn CompletionClient> = Arc::new(HttpCompletionClient::new(config.gateway.clone()));

    let service = SubmissionService::new(repository.clone(), storage, client);

    let state = Arc::new(AppState {
        repository,
        service,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
