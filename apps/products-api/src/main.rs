//! Products API - REST server for the product catalogue

use axum_helpers::{
    close_postgres, cors_layer_from_env, create_production_app, create_router, health_router,
};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = match config.postgres.clone() {
        Some(pg) => {
            info!("Connecting to PostgreSQL");
            let db = connect_from_config_with_retry(pg, None).await?;

            if config.run_migrations {
                run_migrations::<Migrator>(&db, config.app.name).await?;
            }
            Some(db)
        }
        None => {
            info!("Using in-memory product storage; data is lost on restart");
            None
        }
    };

    let state = AppState { config, db };

    // Build REST router
    let api_routes = api::routes(&state);
    let cors = cors_layer_from_env(&state.config.environment)?;
    let router = create_router::<openapi::ApiDoc>(
        api_routes,
        cors,
        state.config.server.request_timeout(),
    )
    .await?;
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::health::router(state.clone()));

    info!(
        "Starting {} v{} on port {} ({:?} storage)",
        state.config.app.name,
        state.config.app.version,
        state.config.server.port,
        state.config.storage
    );

    let server = state.config.server.clone();
    let db = state.db;
    create_production_app(app, &server, server.shutdown_timeout(), async move {
        if let Some(db) = db {
            close_postgres(db, "products").await;
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Products API shutdown complete");
    Ok(())
}
