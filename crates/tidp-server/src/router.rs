//! Router configuration.
//!
//! This module creates the main Axum router that combines all endpoints.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::login::{login_page, login_submit};
use crate::sso::{sso_post, sso_redirect};
use crate::state::AppState;

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let saml = Router::new()
        .route("/apps/{id}/sso", get(sso_redirect).post(sso_post))
        .route("/apps/{id}/login", get(login_page).post(login_submit));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(saml)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// A registered application as listed on the index.
#[derive(Debug, Serialize)]
pub struct AppSummary {
    id: String,
    name: String,
    sp_entity_id: String,
    sp_acs_url: String,
    idp_entity_id: String,
    sso_url: String,
    login_url: String,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// Root endpoint handler: lists registered applications.
async fn root(State(state): State<AppState>) -> Json<Vec<AppSummary>> {
    let config = &state.config;
    Json(
        state
            .apps
            .iter()
            .map(|app| AppSummary {
                id: app.id.clone(),
                name: app.name.clone(),
                sp_entity_id: app.sp_entity_id.clone(),
                sp_acs_url: app.sp_acs_url.clone(),
                idp_entity_id: config.idp_entity_id(&app.id),
                sso_url: config.sso_url(&app.id),
                login_url: format!("{}/apps/{}/login", config.base_url, app.id),
            })
            .collect(),
    )
}
