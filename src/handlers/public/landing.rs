// handlers/public/landing.rs - GET / and GET /health

use axum::extract::State;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - static landing context
pub async fn landing() -> ApiResponse<Value> {
    let version = env!("CARGO_PKG_VERSION");

    ApiResponse::success(json!({
        "name": "Lead CRM",
        "version": version,
        "description": "Lead tracking for organisers and their agents",
        "links": {
            "signup": "/signup",
            "login": "/login",
            "leads": "/leads",
            "agents": "/agents",
            "health": "/health",
        }
    }))
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "store": state.store.backend_tag(),
        }))),
        Err(e) => {
            tracing::error!("Health check failed on {} store: {}", state.store.backend_tag(), e);
            Err(ApiError::service_unavailable("Database unavailable"))
        }
    }
}
