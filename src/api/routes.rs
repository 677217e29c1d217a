use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::error::ApiError;
use crate::api::handlers::{self, AppState};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Portfolio metadata
        .route("/api/version", get(handlers::get_version::<S>))
        .route("/api/config", get(handlers::get_portfolio_config::<S>))
        // Dashboard
        .route("/api/stats", get(handlers::get_stats::<S>))
        .route("/api/ea/structure", get(handlers::get_ea_structure::<S>))
        // Application records
        .route(
            "/api/apps",
            get(handlers::list_applications::<S>).post(handlers::create_application::<S>),
        )
        .route(
            "/api/apps/:app_id",
            get(handlers::get_application::<S>).put(handlers::update_application::<S>),
        )
        .route(
            "/api/apps/:app_id/decommission",
            post(handlers::decommission_application::<S>),
        )
        // Bulk transfer
        .route("/api/export", get(handlers::export_applications::<S>))
        .route("/api/import", post(handlers::import_applications::<S>))
        .fallback(|| async { ApiError::NotFound("Not found".to_string()) })
}

/// Restrict cross-origin access to the configured origins. Origins that are
/// not valid header values are skipped.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-user-name"),
        ])
}
