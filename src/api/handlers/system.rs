//! System endpoints: health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    guilds: Option<usize>,
    timestamp: String,
    version: &'static str,
}

/// `GET /health`: service health and guild store reachability.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Reports whether the guild store is readable and how many guilds are registered. Returns 503 when the store cannot be read.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Guild store unavailable", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status, body) = match state.store.list_guilds().await {
        Ok(guilds) => (
            StatusCode::OK,
            HealthResponse {
                status: "healthy",
                store: "ok",
                guilds: Some(guilds.len()),
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION"),
            },
        ),
        Err(err) => {
            tracing::warn!(error = %err, "health check could not read guild store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthResponse {
                    status: "degraded",
                    store: "unavailable",
                    guilds: None,
                    timestamp: Utc::now().to_rfc3339(),
                    version: env!("CARGO_PKG_VERSION"),
                },
            )
        }
    };
    (status, Json(body))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
