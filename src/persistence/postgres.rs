//! PostgreSQL implementation of the guild store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::GuildStore;
use super::models::{GuildRow, to_db};
use crate::config::HeraldConfig;
use crate::domain::{ChannelId, GuildConfig, GuildId, LeaderboardId};
use crate::error::HeraldError;

const GUILD_COLUMNS: &str = "guild_id, channel_id, leaderboard_id, last_snapshot, updated_at";

/// PostgreSQL-backed guild store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresGuildStore {
    pool: PgPool,
}

impl PostgresGuildStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`HeraldError::PersistenceError`] if the database is
    /// unreachable.
    pub async fn connect(config: &HeraldConfig) -> Result<Self, HeraldError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`HeraldError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), HeraldError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| HeraldError::PersistenceError(e.to_string()))
    }
}

#[async_trait]
impl GuildStore for PostgresGuildStore {
    async fn list_guilds(&self) -> Result<Vec<GuildConfig>, HeraldError> {
        let rows = sqlx::query_as::<_, GuildRow>(&format!(
            "SELECT {GUILD_COLUMNS} FROM guilds ORDER BY guild_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(GuildConfig::try_from).collect()
    }

    async fn get_guild(&self, guild_id: GuildId) -> Result<GuildConfig, HeraldError> {
        let row = sqlx::query_as::<_, GuildRow>(&format!(
            "SELECT {GUILD_COLUMNS} FROM guilds WHERE guild_id = $1"
        ))
        .bind(to_db(guild_id.get())?)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(HeraldError::GuildNotFound(guild_id))?.try_into()
    }

    async fn register_guild(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        leaderboard_id: LeaderboardId,
    ) -> Result<GuildConfig, HeraldError> {
        let row = sqlx::query_as::<_, GuildRow>(&format!(
            "INSERT INTO guilds (guild_id, channel_id, leaderboard_id, last_snapshot, updated_at) \
             VALUES ($1, $2, $3, NULL, now()) \
             ON CONFLICT (guild_id) DO UPDATE \
             SET channel_id = EXCLUDED.channel_id, \
                 leaderboard_id = EXCLUDED.leaderboard_id, \
                 updated_at = now() \
             RETURNING {GUILD_COLUMNS}"
        ))
        .bind(to_db(guild_id.get())?)
        .bind(to_db(channel_id.get())?)
        .bind(to_db(leaderboard_id.get())?)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn save_snapshot(&self, guild_id: GuildId, raw: &str) -> Result<(), HeraldError> {
        let result = sqlx::query(
            "UPDATE guilds SET last_snapshot = $2, updated_at = now() WHERE guild_id = $1",
        )
        .bind(to_db(guild_id.get())?)
        .bind(raw)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HeraldError::GuildNotFound(guild_id));
        }
        Ok(())
    }
}
