use crate::infrastructure::config::DatabaseSettings;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;

pub mod models;

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(settings: &DatabaseSettings) -> Result<DbPool, sqlx::Error> {
    tracing::debug!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "creating database pool"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
        .connect(&settings.url)
        .await
}
