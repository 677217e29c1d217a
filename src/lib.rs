pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic types
pub use logic::{build_ea_structure, compute_stats};

// Export all model types
pub use model::*;

// Export store types
pub use store::{SqliteStore, Store};

use std::sync::Arc;

use crate::api::handlers::PortfolioState;
use crate::config::AppConfig;

/// Open the configured store, bring its schema up to date, seed it when
/// empty and return the fully layered router.
pub async fn build_app(config: &AppConfig) -> anyhow::Result<axum::Router> {
    let database_url = config.database_url();
    log::info!("Opening application store at {}", database_url);
    let sqlite_store = SqliteStore::new(&database_url, config.max_connections()).await?;

    sqlite_store.migrate().await?;

    if config.database.seed_demo_data {
        seed::load_seed_data(&sqlite_store).await?;
    }

    let state = Arc::new(PortfolioState::new(
        Arc::new(sqlite_store),
        config.portfolio.clone(),
    ));

    Ok(routes::create_router()
        .with_state(state)
        .layer(routes::cors_layer(&config.allowed_origins())))
}
