//! Per-guild configuration row.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ChannelId, GuildId, LeaderboardId};

/// One guild's leaderboard subscription and its polling baseline.
///
/// `last_snapshot` is `None` until the first successful cycle completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuildConfig {
    /// Guild that registered the subscription.
    pub guild_id: GuildId,
    /// Channel announcements are posted to.
    pub channel_id: ChannelId,
    /// Private leaderboard being tracked.
    pub leaderboard_id: LeaderboardId,
    /// Raw body of the last snapshot that was diffed.
    #[serde(skip)]
    pub last_snapshot: Option<String>,
    /// Last time the row was registered or synced.
    pub updated_at: DateTime<Utc>,
}

impl GuildConfig {
    /// Creates a freshly registered guild with no baseline.
    #[must_use]
    pub fn new(guild_id: GuildId, channel_id: ChannelId, leaderboard_id: LeaderboardId) -> Self {
        Self {
            guild_id,
            channel_id,
            leaderboard_id,
            last_snapshot: None,
            updated_at: Utc::now(),
        }
    }

    /// Returns `true` once a snapshot has been stored as baseline.
    #[must_use]
    pub fn has_baseline(&self) -> bool {
        self.last_snapshot.is_some()
    }

    /// Confirmation text sent back to whoever registered the guild.
    #[must_use]
    pub fn confirmation(&self) -> String {
        format!(
            "Updated guild {} to use channel {} and leaderboard {}!",
            self.guild_id, self.channel_id, self.leaderboard_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_guild_has_no_baseline() {
        let guild = GuildConfig::new(GuildId::new(1), ChannelId::new(2), LeaderboardId::new(3));
        assert!(!guild.has_baseline());
        assert_eq!(
            guild.confirmation(),
            "Updated guild 1 to use channel 2 and leaderboard 3!"
        );
    }

    #[test]
    fn snapshot_body_is_not_serialized() {
        let mut guild =
            GuildConfig::new(GuildId::new(1), ChannelId::new(2), LeaderboardId::new(3));
        guild.last_snapshot = Some("{\"members\":{}}".to_string());
        let json = serde_json::to_string(&guild).unwrap_or_default();
        assert!(!json.contains("members"));
        assert!(json.contains("\"leaderboard_id\":3"));
    }
}
