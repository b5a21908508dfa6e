//! Promptforge Database Library
//!
//! Persistence for submission records: the `SubmissionRepository` over
//! Postgres and the narrow `SubmissionStore` trait the pipeline depends on
//! so tests can run against an in-memory store.

pub mod repository;
pub mod store;

pub use repository::SubmissionRepository;
pub use store::{CompletionUpdate, NewSubmission, SubmissionStore};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Connect to Postgres with a bounded pool.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await
}

/// Run embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
