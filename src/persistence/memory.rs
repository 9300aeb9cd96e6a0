//! In-memory guild store.
//!
//! Keeps rows in a `tokio::sync::RwLock<HashMap>`. Nothing survives a
//! restart, so every guild starts over with no baseline.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::GuildStore;
use crate::domain::{ChannelId, GuildConfig, GuildId, LeaderboardId};
use crate::error::HeraldError;

/// Volatile [`GuildStore`] backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryGuildStore {
    guilds: RwLock<HashMap<GuildId, GuildConfig>>,
}

impl InMemoryGuildStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given rows.
    #[must_use]
    pub fn with_guilds(guilds: impl IntoIterator<Item = GuildConfig>) -> Self {
        Self {
            guilds: RwLock::new(guilds.into_iter().map(|g| (g.guild_id, g)).collect()),
        }
    }
}

#[async_trait]
impl GuildStore for InMemoryGuildStore {
    async fn list_guilds(&self) -> Result<Vec<GuildConfig>, HeraldError> {
        let map = self.guilds.read().await;
        let mut guilds: Vec<GuildConfig> = map.values().cloned().collect();
        guilds.sort_by_key(|g| g.guild_id);
        Ok(guilds)
    }

    async fn get_guild(&self, guild_id: GuildId) -> Result<GuildConfig, HeraldError> {
        self.guilds
            .read()
            .await
            .get(&guild_id)
            .cloned()
            .ok_or(HeraldError::GuildNotFound(guild_id))
    }

    async fn register_guild(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        leaderboard_id: LeaderboardId,
    ) -> Result<GuildConfig, HeraldError> {
        let mut map = self.guilds.write().await;
        let entry = map
            .entry(guild_id)
            .and_modify(|g| {
                g.channel_id = channel_id;
                g.leaderboard_id = leaderboard_id;
                g.updated_at = Utc::now();
            })
            .or_insert_with(|| GuildConfig::new(guild_id, channel_id, leaderboard_id));
        Ok(entry.clone())
    }

    async fn save_snapshot(&self, guild_id: GuildId, raw: &str) -> Result<(), HeraldError> {
        let mut map = self.guilds.write().await;
        let guild = map
            .get_mut(&guild_id)
            .ok_or(HeraldError::GuildNotFound(guild_id))?;
        guild.last_snapshot = Some(raw.to_string());
        guild.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_get() {
        let store = InMemoryGuildStore::new();
        let result = store
            .register_guild(GuildId::new(1), ChannelId::new(10), LeaderboardId::new(100))
            .await;
        assert!(result.is_ok());

        let Ok(guild) = store.get_guild(GuildId::new(1)).await else {
            panic!("guild should exist");
        };
        assert_eq!(guild.channel_id, ChannelId::new(10));
        assert!(!guild.has_baseline());
    }

    #[tokio::test]
    async fn reregister_updates_in_place_and_keeps_snapshot() {
        let store = InMemoryGuildStore::new();
        let _ = store
            .register_guild(GuildId::new(1), ChannelId::new(10), LeaderboardId::new(100))
            .await;
        let _ = store.save_snapshot(GuildId::new(1), "{\"members\":{}}").await;

        let Ok(updated) = store
            .register_guild(GuildId::new(1), ChannelId::new(11), LeaderboardId::new(101))
            .await
        else {
            panic!("re-register failed");
        };
        assert_eq!(updated.channel_id, ChannelId::new(11));
        assert_eq!(updated.leaderboard_id, LeaderboardId::new(101));
        assert!(updated.has_baseline());

        let all = store.list_guilds().await.unwrap_or_default();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn save_snapshot_for_unknown_guild_fails() {
        let store = InMemoryGuildStore::new();
        let result = store.save_snapshot(GuildId::new(404), "{}").await;
        assert!(matches!(result, Err(HeraldError::GuildNotFound(_))));
    }

    #[tokio::test]
    async fn list_is_ordered_by_guild_id() {
        let store = InMemoryGuildStore::with_guilds([
            GuildConfig::new(GuildId::new(3), ChannelId::new(1), LeaderboardId::new(1)),
            GuildConfig::new(GuildId::new(1), ChannelId::new(1), LeaderboardId::new(1)),
        ]);
        let ids: Vec<u64> = store
            .list_guilds()
            .await
            .unwrap_or_default()
            .iter()
            .map(|g| g.guild_id.get())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
