//! IVR webhook service
//!
//! Serves the telephony platform's webhook contract and runs the order
//! confirmation call flow behind it.

mod api;
mod config;
mod db;
mod directory;
mod flow;
mod prompts;
mod runtime;
mod state_machine;
mod webhook;

use api::{create_router, AppState};
use config::AppConfig;
use db::Database;
use directory::{CustomerDirectory, StaticDirectory};
use flow::ConfirmationFlow;
use runtime::DatabaseOutcomeStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ivr_webhook=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();

    // Ensure database directory exists
    if let Some(parent) = PathBuf::from(&config.db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path, "Opening database");
    let db = Database::open(&config.db_path)?;

    let directory: Arc<dyn CustomerDirectory> = match &config.customers_path {
        Some(path) => {
            let directory = StaticDirectory::from_file(path)?;
            tracing::info!(
                path = %path.display(),
                customers = directory.len(),
                "Customer directory loaded"
            );
            Arc::new(directory)
        }
        None => {
            tracing::warn!("IVR_CUSTOMERS_PATH not set, using sample customer");
            Arc::new(StaticDirectory::sample())
        }
    };

    let flow = ConfirmationFlow::from_config(&config, directory);
    tracing::info!(
        brand = %config.brand_name,
        schema = %config.schema_path.display(),
        direction = ?config.direction,
        capabilities = ?config.capabilities,
        "Confirmation flow ready"
    );

    let state = AppState::new(flow, Arc::new(DatabaseOutcomeStore::new(db)));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("IVR webhook listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
