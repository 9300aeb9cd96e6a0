//! Guild registration handlers: register, list, get.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{GuildDto, GuildListResponse, RegisterGuildRequest, RegisterGuildResponse};
use crate::app_state::AppState;
use crate::domain::{ChannelId, GuildId, LeaderboardId};
use crate::error::{ErrorResponse, HeraldError};

/// `PUT /guilds/{guild_id}`: Register or update a guild.
///
/// # Errors
///
/// Returns [`HeraldError::InvalidRequest`] for zero ids, or a
/// persistence error from the store.
#[utoipa::path(
    put,
    path = "/api/v1/guilds/{guild_id}",
    tag = "Guilds",
    summary = "Register a guild",
    description = "Sets the announcement channel and leaderboard for a guild. Re-registering updates the existing row and keeps its baseline snapshot.",
    params(
        ("guild_id" = u64, Path, description = "Guild snowflake"),
    ),
    request_body = RegisterGuildRequest,
    responses(
        (status = 200, description = "Guild registered", body = RegisterGuildResponse),
        (status = 400, description = "Invalid ids", body = ErrorResponse),
    )
)]
pub async fn register_guild(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
    Json(req): Json<RegisterGuildRequest>,
) -> Result<impl IntoResponse, HeraldError> {
    if guild_id == 0 || req.channel_id == 0 || req.leaderboard_id == 0 {
        return Err(HeraldError::InvalidRequest(
            "guild_id, channel_id and leaderboard_id must be non-zero".to_string(),
        ));
    }

    let guild = state
        .store
        .register_guild(
            GuildId::new(guild_id),
            ChannelId::new(req.channel_id),
            LeaderboardId::new(req.leaderboard_id),
        )
        .await?;

    tracing::info!(
        guild_id = %guild.guild_id,
        channel_id = %guild.channel_id,
        leaderboard_id = %guild.leaderboard_id,
        "guild registered"
    );

    Ok(Json(RegisterGuildResponse {
        guild: GuildDto::from(&guild),
        message: guild.confirmation(),
    }))
}

/// `GET /guilds`: List all registered guilds.
///
/// # Errors
///
/// Returns a persistence error from the store.
#[utoipa::path(
    get,
    path = "/api/v1/guilds",
    tag = "Guilds",
    summary = "List guilds",
    responses(
        (status = 200, description = "All registrations", body = GuildListResponse),
    )
)]
pub async fn list_guilds(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, HeraldError> {
    let guilds = state.store.list_guilds().await?;
    let data: Vec<GuildDto> = guilds.iter().map(GuildDto::from).collect();
    Ok(Json(GuildListResponse {
        total: data.len(),
        data,
    }))
}

/// `GET /guilds/{guild_id}`: Get one registration.
///
/// # Errors
///
/// Returns [`HeraldError::GuildNotFound`] if the guild is not registered.
#[utoipa::path(
    get,
    path = "/api/v1/guilds/{guild_id}",
    tag = "Guilds",
    summary = "Get a guild",
    params(
        ("guild_id" = u64, Path, description = "Guild snowflake"),
    ),
    responses(
        (status = 200, description = "Guild registration", body = GuildDto),
        (status = 404, description = "Guild not registered", body = ErrorResponse),
    )
)]
pub async fn get_guild(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
) -> Result<impl IntoResponse, HeraldError> {
    let guild = state.store.get_guild(GuildId::new(guild_id)).await?;
    Ok(Json(GuildDto::from(&guild)))
}

/// Guild registration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/guilds", get(list_guilds))
        .route("/guilds/{guild_id}", get(get_guild).put(register_guild))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::build_router;
    use crate::app_state::AppState;
    use crate::persistence::InMemoryGuildStore;

    fn app() -> axum::Router {
        build_router().with_state(AppState {
            store: Arc::new(InMemoryGuildStore::new()),
        })
    }

    fn put(uri: &str, body: &str) -> Request<Body> {
        let Ok(request) = Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("request should build");
        };
        request
    }

    fn get(uri: &str) -> Request<Body> {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("request should build");
        };
        request
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        serde_json::from_slice(&bytes).unwrap_or_default()
    }

    #[tokio::test]
    async fn register_returns_confirmation() {
        let Ok(response) = app()
            .oneshot(put(
                "/api/v1/guilds/10",
                r#"{"channel_id": 20, "leaderboard_id": 30}"#,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(
            json["message"],
            "Updated guild 10 to use channel 20 and leaderboard 30!"
        );
        assert_eq!(json["guild"]["has_baseline"], false);
    }

    #[tokio::test]
    async fn register_rejects_zero_ids() {
        let Ok(response) = app()
            .oneshot(put(
                "/api/v1/guilds/10",
                r#"{"channel_id": 0, "leaderboard_id": 30}"#,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], 1001);
    }

    #[tokio::test]
    async fn reregister_is_idempotent() {
        let app = app();
        for channel in [20, 21] {
            let body = format!(r#"{{"channel_id": {channel}, "leaderboard_id": 30}}"#);
            let Ok(response) = app.clone().oneshot(put("/api/v1/guilds/10", &body)).await;
            assert_eq!(response.status(), StatusCode::OK);
        }

        let Ok(response) = app.oneshot(get("/api/v1/guilds")).await;
        let json = body_json(response).await;
        assert_eq!(json["total"], 1);
        assert_eq!(json["data"][0]["channel_id"], 21);
    }

    #[tokio::test]
    async fn unknown_guild_is_404() {
        let Ok(response) = app().oneshot(get("/api/v1/guilds/99")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
