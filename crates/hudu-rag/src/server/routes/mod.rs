//! API routes for the Q&A server

pub mod query;
pub mod sessions;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{delete, get, post},
    Json, Router,
};

use crate::server::state::AppState;
use crate::types::response::{HealthResponse, HealthStatus, RootResponse};

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Ingestion - with larger body limit for file uploads
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/upload-url", post(upload::upload_url))
        .route("/query", post(query::query))
        // Sessions
        .route("/session/:id", delete(sessions::delete_session))
        .route("/sessions", get(sessions::list_sessions))
}

/// Service banner
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "HuduAssist KE API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
    })
}

/// Health with credential and provider diagnostics
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let api_key_configured = state.config().api_key_configured();
    let module_error = state.provider_error().map(str::to_string);
    let modules_loaded = module_error.is_none();

    let status = if api_key_configured && modules_loaded {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    Json(HealthResponse {
        status,
        api_key_configured,
        modules_loaded,
        module_error,
    })
}
