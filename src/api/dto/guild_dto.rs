//! Request and response bodies for guild registration endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::GuildConfig;

/// Request body for `PUT /api/v1/guilds/{guild_id}`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterGuildRequest {
    /// Channel announcements are posted to.
    pub channel_id: u64,
    /// Private leaderboard to track.
    pub leaderboard_id: u64,
}

/// Public view of a guild registration. The stored snapshot body is
/// reduced to a flag.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuildDto {
    /// Guild id.
    pub guild_id: u64,
    /// Announcement channel id.
    pub channel_id: u64,
    /// Tracked leaderboard id.
    pub leaderboard_id: u64,
    /// Whether a baseline snapshot has been stored.
    pub has_baseline: bool,
    /// Last registration or sync time.
    pub updated_at: DateTime<Utc>,
}

impl From<&GuildConfig> for GuildDto {
    fn from(guild: &GuildConfig) -> Self {
        Self {
            guild_id: guild.guild_id.get(),
            channel_id: guild.channel_id.get(),
            leaderboard_id: guild.leaderboard_id.get(),
            has_baseline: guild.has_baseline(),
            updated_at: guild.updated_at,
        }
    }
}

/// Response for a successful registration.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegisterGuildResponse {
    /// The stored registration.
    pub guild: GuildDto,
    /// Confirmation text suitable for echoing back to the guild.
    pub message: String,
}

/// Response for `GET /api/v1/guilds`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuildListResponse {
    /// All registrations, ordered by guild id.
    pub data: Vec<GuildDto>,
    /// Number of registrations.
    pub total: usize,
}
