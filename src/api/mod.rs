//! Admin REST API: guild registration and health.
//!
//! Resource endpoints are mounted under `/api/v1`. The OpenAPI document
//! is served at `/api-docs/openapi.json`, with Swagger UI at
//! `/swagger-ui` when the `swagger-ui` feature is enabled.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of the admin API.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        handlers::guild::register_guild,
        handlers::guild::list_guilds,
        handlers::guild::get_guild,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Guilds", description = "Leaderboard subscriptions per guild"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route(
        "/api-docs/openapi.json",
        axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
    );

    router
}
