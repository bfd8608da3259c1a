// Framework bootstrap for the wedding server runtime.

use crate::frameworks::config::{Settings, StorageBackend};
use crate::frameworks::db;
use crate::interface_adapters::postgres::PostgresStore;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;

use std::io::{Error, Result};
use std::net::SocketAddr;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, state: AppState) -> Result<()> {
    let address = listener.local_addr()?;
    let app = app(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = Settings::load().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        Error::other(e.to_string())
    })?;
    let state = build_state(&settings).await?;

    let address = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, state).await
}

async fn build_state(settings: &Settings) -> Result<AppState> {
    let service = settings.service_settings();
    match settings.storage {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            Ok(AppState::in_memory(service))
        }
        StorageBackend::Postgres => {
            let database_url = settings
                .database_url
                .as_deref()
                .ok_or_else(|| Error::other("DATABASE_URL must be set for postgres storage"))?;

            let pool = db::connect_pool(database_url, settings.db_max_connections)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "failed to connect to database");
                    Error::other(format!("failed to connect to database: {e}"))
                })?;
            db::run_migrations(&pool).await.map_err(|e| {
                tracing::error!(error = %e, "failed to run migrations");
                Error::other(format!("failed to run migrations: {e}"))
            })?;
            tracing::debug!(
                max_connections = settings.db_max_connections,
                "database ready"
            );

            Ok(AppState::with_store(PostgresStore::new(pool), service))
        }
    }
}
