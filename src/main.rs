//! Tiffin Bot - conversational ordering for a tiffin service
//!
//! Customers place orders through a scripted chat; the kitchen follows
//! them from new to delivered.

mod api;
mod config;
mod db;
mod kitchen;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use config::{ServerConfig, StoreBackend};
use db::{JsonFileStore, OrderStore, SqliteStore};
use runtime::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiffin_bot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ServerConfig::from_env();

    // Ensure data directory exists
    if let Some(parent) = config.data_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(
        path = %config.data_path.display(),
        backend = ?config.backend,
        "Opening order store"
    );
    let store: Arc<dyn OrderStore> = match config.backend {
        StoreBackend::Json => Arc::new(JsonFileStore::open(&config.data_path).await?),
        StoreBackend::Sqlite => Arc::new(SqliteStore::open(&config.data_path)?),
    };

    let state = AppState::new(Arc::new(SessionManager::new(store)));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state).layer(cors).layer(compression);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Tiffin Bot server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
