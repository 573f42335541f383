//! Health check endpoint
//!
//! Pings the pool with `SELECT 1`; 503 when the database is unreachable.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

impl HealthResponse {
    fn new(database_up: bool) -> Self {
        let (status, database) = if database_up {
            ("ok", "ok")
        } else {
            ("degraded", "unavailable")
        };
        Self {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (StatusCode::OK, Json(HealthResponse::new(true))),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new(false)),
            )
        }
    }
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
