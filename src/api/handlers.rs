use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::PortfolioConfig;
use crate::logic::{build_ea_structure, compute_stats};
use crate::model::{
    Application, ApplicationError, ApplicationFilter, ApplicationWrite, DecommissionRequest,
    EaGroupSummary, ExportQuery, ImportMode, ImportRequest, ImportSummary, NewApplication,
    PortfolioStats, UserContext,
};
use crate::store::traits::Store;

/// Shared state handed to every handler
pub struct PortfolioState<S> {
    pub store: Arc<S>,
    pub portfolio: PortfolioConfig,
}

impl<S> PortfolioState<S> {
    pub fn new(store: Arc<S>, portfolio: PortfolioConfig) -> Self {
        Self { store, portfolio }
    }
}

pub type AppState<S> = Arc<PortfolioState<S>>;

/// Simple health check endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub app_name: String,
    pub subtitle: String,
    pub title: String,
    pub page_title: String,
    pub logo_sub: String,
}

impl From<&PortfolioConfig> for VersionResponse {
    fn from(cfg: &PortfolioConfig) -> Self {
        Self {
            version: cfg.version.clone(),
            app_name: cfg.app_name.clone(),
            subtitle: cfg.subtitle.clone(),
            title: format!("{} {}", cfg.app_name, cfg.version),
            page_title: format!("{} EA Portfolio {}", cfg.app_name, cfg.version),
            logo_sub: format!("{} {}", cfg.subtitle, cfg.version),
        }
    }
}

pub async fn get_version<S: Store>(State(state): State<AppState<S>>) -> Json<VersionResponse> {
    Json(VersionResponse::from(&state.portfolio))
}

pub async fn get_portfolio_config<S: Store>(
    State(state): State<AppState<S>>,
) -> Json<PortfolioConfig> {
    Json(state.portfolio.clone())
}

pub async fn get_stats<S: Store>(State(state): State<AppState<S>>) -> ApiResult<PortfolioStats> {
    let applications = state
        .store
        .list_applications(&ApplicationFilter::everything())
        .await?;
    Ok(Json(compute_stats(&applications)))
}

pub async fn list_applications<S: Store>(
    State(state): State<AppState<S>>,
    Query(filter): Query<ApplicationFilter>,
) -> ApiResult<Vec<Application>> {
    let applications = state
        .store
        .list_applications(&filter.normalized())
        .await?;
    Ok(Json(applications))
}

pub async fn get_application<S: Store>(
    State(state): State<AppState<S>>,
    Path(app_id): Path<String>,
) -> ApiResult<Application> {
    match state.store.get_application(&app_id).await? {
        Some(application) => Ok(Json(application)),
        None => Err(ApiError::app_not_found(&app_id)),
    }
}

pub async fn create_application<S: Store>(
    State(state): State<AppState<S>>,
    user: UserContext,
    RequestJson(new_application): RequestJson<NewApplication>,
) -> Result<(StatusCode, Json<Application>), ApiError> {
    let app_id = match new_application.supplied_id() {
        Some(id) => {
            if state.store.get_application(&id).await?.is_some() {
                return Err(ApplicationError::DuplicateId(id).into());
            }
            id
        }
        None => state.store.next_application_id().await?,
    };

    let application = new_application.into_application(app_id, &user)?;
    state.store.insert_application(&application).await?;

    log::info!(
        "Created application {} ({}) by {}",
        application.id,
        application.name,
        user.label()
    );
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn update_application<S: Store>(
    State(state): State<AppState<S>>,
    Path(app_id): Path<String>,
    user: UserContext,
    RequestJson(update): RequestJson<ApplicationWrite>,
) -> ApiResult<Application> {
    let mut application = state
        .store
        .get_application(&app_id)
        .await?
        .ok_or_else(|| ApiError::app_not_found(&app_id))?;

    application.apply_update(update, &user)?;
    if !state.store.update_application(&application).await? {
        return Err(write_refused(&*state.store, &app_id).await);
    }

    log::info!("Updated application {} by {}", app_id, user.label());
    Ok(Json(application))
}

pub async fn decommission_application<S: Store>(
    State(state): State<AppState<S>>,
    Path(app_id): Path<String>,
    user: UserContext,
    RequestJson(request): RequestJson<DecommissionRequest>,
) -> ApiResult<Application> {
    let mut application = state
        .store
        .get_application(&app_id)
        .await?
        .ok_or_else(|| ApiError::app_not_found(&app_id))?;

    application.decommission(request, &user)?;
    if !state.store.decommission_application(&application).await? {
        return Err(write_refused(&*state.store, &app_id).await);
    }

    log::info!(
        "Decommissioned application {} effective {:?} by {}",
        app_id,
        application.decomm_date,
        user.label()
    );
    Ok(Json(application))
}

/// Why a guarded write touched no row: the record vanished or was retired
/// by a concurrent request
async fn write_refused<S: Store>(store: &S, app_id: &str) -> ApiError {
    match store.get_application(app_id).await {
        Ok(Some(_)) => ApplicationError::AlreadyDecommissioned(app_id.to_string()).into(),
        Ok(None) => ApiError::app_not_found(app_id),
        Err(e) => e.into(),
    }
}

pub async fn export_applications<S: Store>(
    State(state): State<AppState<S>>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<Vec<Application>> {
    let applications = state
        .store
        .list_applications(&ApplicationFilter::from(query))
        .await?;
    Ok(Json(applications))
}

pub async fn import_applications<S: Store>(
    State(state): State<AppState<S>>,
    user: UserContext,
    RequestJson(request): RequestJson<ImportRequest>,
) -> ApiResult<ImportSummary> {
    if request.apps.is_empty() {
        return Err(ApiError::BadRequest("No apps provided".to_string()));
    }

    let received = request.apps.len();
    let valid: Vec<Application> = request
        .apps
        .into_iter()
        .filter_map(|app| app.into_imported(&user).ok())
        .collect();
    let rejected = received - valid.len();

    if request.mode == ImportMode::Replace && valid.is_empty() {
        return Err(ApiError::BadRequest(
            "No valid apps to import (all records missing id or name); replace aborted"
                .to_string(),
        ));
    }

    let outcome = state
        .store
        .import_applications(valid, request.mode)
        .await?;
    let summary = ImportSummary::new(outcome, rejected);

    log::info!(
        "Import ({:?}) by {}: {} added, {} updated, {} errors",
        request.mode,
        user.label(),
        summary.added,
        summary.updated,
        summary.errors
    );
    Ok(Json(summary))
}

pub async fn get_ea_structure<S: Store>(
    State(state): State<AppState<S>>,
) -> ApiResult<Vec<EaGroupSummary>> {
    let counts = state.store.count_by_ea_category().await?;
    Ok(Json(build_ea_structure(&counts)))
}
