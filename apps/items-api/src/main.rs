use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_items::LocalFileStorage;
use migration::Migrator;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    info!("Connecting to database");
    let db =
        database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;

    database::postgres::run_migrations::<Migrator>(&db, config.app.name).await?;

    let storage = LocalFileStorage::new(&config.storage.upload_dir).await?;

    let state = AppState::new(config, db, storage);

    let app = api::app(&state)?;

    info!(
        api_prefix = %state.config.server.api_prefix,
        upload_dir = %state.storage.root().display(),
        max_upload_bytes = state.config.storage.max_upload_bytes,
        "Starting Items API with graceful shutdown (30s timeout)"
    );

    let db = state.db.clone();
    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match db.close().await {
                Ok(()) => info!("Database connection closed successfully"),
                Err(e) => warn!(error = %e, "Failed to close database connection"),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Items API shutdown complete");
    Ok(())
}
