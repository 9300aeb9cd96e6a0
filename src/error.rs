//! Error types for snapshot parsing, diffing, and the polling service.
//!
//! [`SnapshotError`] and [`DiffError`] come from the pure domain layer.
//! [`HeraldError`] is the service-wide error; each variant maps to a
//! numeric code and an HTTP status for the admin API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::GuildId;

/// A raw snapshot that does not have the leaderboard shape.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Not JSON, or the `members` map is missing or mistyped.
    #[error("snapshot does not match the leaderboard shape: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A `completion_day_level` key is not a day number.
    #[error("member {member}: day key {key:?} is not a day number")]
    InvalidDay {
        /// Member whose entry is broken.
        member: String,
        /// Offending key.
        key: String,
    },

    /// A `get_star_ts` value is neither an integer nor an integer string.
    #[error("member {member}: day {day} star timestamp {value:?} is not an integer")]
    InvalidTimestamp {
        /// Member whose entry is broken.
        member: String,
        /// Day the timestamp belongs to.
        day: u32,
        /// Offending value.
        value: String,
    },
}

/// Which side of a diff could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The stored baseline snapshot is unreadable.
    #[error("previous snapshot is unreadable: {0}")]
    Previous(#[source] SnapshotError),

    /// The freshly fetched snapshot is unreadable.
    #[error("current snapshot is unreadable: {0}")]
    Current(#[source] SnapshotError),
}

/// Structured JSON error response body.
///
/// ```json
/// { "error": { "code": 2001, "message": "guild not found: 42" } }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Service-wide error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status               |
/// |-----------|------------------|---------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request           |
/// | 2000–2999 | Not Found        | 404 Not Found             |
/// | 3000–3999 | Server           | 500 Internal Server Error |
/// | 5000–5999 | Upstream         | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum HeraldError {
    /// Guild has not been registered.
    #[error("guild not found: {0}")]
    GuildNotFound(GuildId),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Leaderboard fetch failed (transport or non-success status).
    #[error("leaderboard fetch failed: {0}")]
    Fetch(String),

    /// Fetched body is not a leaderboard snapshot.
    #[error("guild {guild_id}: fetched snapshot is malformed: {source}")]
    MalformedSnapshot {
        /// Guild whose cycle failed.
        guild_id: GuildId,
        /// Parse failure.
        #[source]
        source: SnapshotError,
    },

    /// Stored baseline snapshot is unreadable.
    #[error("guild {guild_id}: stored baseline snapshot is corrupt: {source}")]
    CorruptBaseline {
        /// Guild whose cycle failed.
        guild_id: GuildId,
        /// Parse failure.
        #[source]
        source: SnapshotError,
    },

    /// Announcement delivery failed.
    #[error("announcement dispatch failed: {0}")]
    Dispatch(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HeraldError {
    /// Classifies a diff failure for the given guild.
    #[must_use]
    pub fn from_diff(guild_id: GuildId, err: DiffError) -> Self {
        match err {
            DiffError::Previous(source) => Self::CorruptBaseline { guild_id, source },
            DiffError::Current(source) => Self::MalformedSnapshot { guild_id, source },
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::GuildNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::CorruptBaseline { .. } => 3002,
            Self::Fetch(_) => 5001,
            Self::MalformedSnapshot { .. } => 5002,
            Self::Dispatch(_) => 5003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::GuildNotFound(_) => StatusCode::NOT_FOUND,
            Self::PersistenceError(_) | Self::CorruptBaseline { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Fetch(_) | Self::MalformedSnapshot { .. } | Self::Dispatch(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for HeraldError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

impl From<sqlx::Error> for HeraldError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}
