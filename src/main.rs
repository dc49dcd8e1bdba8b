use rolekit::infrastructure;
use rolekit::infrastructure::config::{DatabaseSettings, RepositoryConfig};
use rolekit::infrastructure::state::AppState;
use rolekit::presentation;

use anyhow::Context;
use dotenvy::dotenv;
use std::env;
use std::future::Future;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    run_with_signal(port).await
}

async fn run_with_signal(port: u16) -> anyhow::Result<()> {
    run(port, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run<F>(port: u16, shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    dotenv().ok();

    // tests may initialize more than once
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "rolekit=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let (listener, app) = bootstrap(&database_url, port).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    Ok(())
}

async fn bootstrap(
    database_url: &str,
    port: u16,
) -> anyhow::Result<(tokio::net::TcpListener, axum::Router)> {
    let settings = DatabaseSettings::from_env(database_url);
    let pool = infrastructure::db::create_pool(&settings).await?;

    sqlx::migrate!().run(&pool).await?;

    let config = RepositoryConfig::from_env();
    tracing::debug!(
        table_prefix = %config.table_prefix,
        locale = %config.search_locale,
        "repository configuration loaded"
    );
    let app = presentation::router::app(AppState::load(pool, config)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::debug!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    Ok((listener, app))
}
