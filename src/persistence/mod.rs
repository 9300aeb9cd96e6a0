//! Persistence layer: one row per guild with its last snapshot.
//!
//! [`GuildStore`] is the seam the coordinator, scheduler, and admin API
//! depend on. [`PostgresGuildStore`] is the durable implementation;
//! [`InMemoryGuildStore`] backs tests and runs with persistence disabled.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{ChannelId, GuildConfig, GuildId, LeaderboardId};
use crate::error::HeraldError;

pub use memory::InMemoryGuildStore;
pub use postgres::PostgresGuildStore;

/// Storage for guild subscriptions and their polling baselines.
#[async_trait]
pub trait GuildStore: Send + Sync + fmt::Debug {
    /// Returns every registered guild, ordered by guild id.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::PersistenceError`] on storage failure.
    async fn list_guilds(&self) -> Result<Vec<GuildConfig>, HeraldError>;

    /// Returns one guild.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::GuildNotFound`] if the guild is not
    /// registered, or [`HeraldError::PersistenceError`] on storage failure.
    async fn get_guild(&self, guild_id: GuildId) -> Result<GuildConfig, HeraldError>;

    /// Registers a guild or updates its channel and leaderboard.
    ///
    /// Idempotent: re-registering updates the existing row and keeps its
    /// stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::PersistenceError`] on storage failure.
    async fn register_guild(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        leaderboard_id: LeaderboardId,
    ) -> Result<GuildConfig, HeraldError>;

    /// Replaces the guild's baseline snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::GuildNotFound`] if the guild is not
    /// registered, or [`HeraldError::PersistenceError`] on storage failure.
    async fn save_snapshot(&self, guild_id: GuildId, raw: &str) -> Result<(), HeraldError>;
}
