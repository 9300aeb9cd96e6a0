//! Database row model for the `guilds` table.

use chrono::{DateTime, Utc};

use crate::domain::{ChannelId, GuildConfig, GuildId, LeaderboardId};
use crate::error::HeraldError;

/// A row of the `guilds` table as returned by `sqlx`.
///
/// Snowflake ids are stored as `BIGINT`; conversion to the domain's `u64`
/// ids is checked.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GuildRow {
    /// Guild id.
    pub guild_id: i64,
    /// Announcement channel id.
    pub channel_id: i64,
    /// Tracked leaderboard id.
    pub leaderboard_id: i64,
    /// Raw body of the last diffed snapshot.
    pub last_snapshot: Option<String>,
    /// Last registration or sync time.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<GuildRow> for GuildConfig {
    type Error = HeraldError;

    fn try_from(row: GuildRow) -> Result<Self, Self::Error> {
        Ok(Self {
            guild_id: GuildId::new(from_db(row.guild_id)?),
            channel_id: ChannelId::new(from_db(row.channel_id)?),
            leaderboard_id: LeaderboardId::new(from_db(row.leaderboard_id)?),
            last_snapshot: row.last_snapshot,
            updated_at: row.updated_at,
        })
    }
}

/// Converts a domain id to its `BIGINT` column value.
///
/// # Errors
///
/// Returns [`HeraldError::InvalidRequest`] if the id exceeds `i64::MAX`.
pub fn to_db(id: u64) -> Result<i64, HeraldError> {
    i64::try_from(id).map_err(|_| HeraldError::InvalidRequest(format!("id {id} is out of range")))
}

fn from_db(value: i64) -> Result<u64, HeraldError> {
    u64::try_from(value)
        .map_err(|_| HeraldError::PersistenceError(format!("negative id {value} in guilds table")))
}
