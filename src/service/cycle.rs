//! Guild cycle coordinator: fetch → diff → format → dispatch → persist.

use std::sync::Arc;

use crate::clients::{AnnouncementDispatcher, SnapshotFetcher};
use crate::domain::{self, GuildConfig};
use crate::error::HeraldError;
use crate::persistence::GuildStore;

/// Result of one successful guild cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Lines delivered to the guild's channel.
    pub lines_announced: usize,
    /// Delivery failure, if dispatch was attempted and failed. The
    /// baseline has been advanced regardless.
    pub dispatch_error: Option<String>,
}

/// Runs one polling cycle for one guild.
///
/// Holds the three injected collaborators. Steps run strictly in order,
/// and the fetched snapshot is persisted only after it was diffed and its
/// announcement attempted. Delivery is at-most-once: a failed dispatch
/// still advances the baseline.
#[derive(Debug, Clone)]
pub struct GuildCycle {
    fetcher: Arc<dyn SnapshotFetcher>,
    dispatcher: Arc<dyn AnnouncementDispatcher>,
    store: Arc<dyn GuildStore>,
}

impl GuildCycle {
    /// Creates a coordinator over the given collaborators.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn SnapshotFetcher>,
        dispatcher: Arc<dyn AnnouncementDispatcher>,
        store: Arc<dyn GuildStore>,
    ) -> Self {
        Self {
            fetcher,
            dispatcher,
            store,
        }
    }

    /// Returns the guild store this coordinator persists to.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn GuildStore> {
        &self.store
    }

    /// Runs fetch → diff → format → dispatch → persist for `guild`.
    ///
    /// # Errors
    ///
    /// - [`HeraldError::Fetch`] or [`HeraldError::MalformedSnapshot`]:
    ///   nothing is announced or stored; the next tick retries.
    /// - [`HeraldError::CorruptBaseline`]: the stored snapshot is
    ///   unreadable; history is left untouched rather than reset.
    /// - [`HeraldError::PersistenceError`] / [`HeraldError::GuildNotFound`]
    ///   if the new baseline cannot be stored.
    ///
    /// A dispatch failure is not an error; it is reported in
    /// [`CycleOutcome::dispatch_error`].
    pub async fn run(&self, guild: &GuildConfig) -> Result<CycleOutcome, HeraldError> {
        let guild_id = guild.guild_id;
        let fetched = self.fetcher.fetch(guild.leaderboard_id).await?;

        let diff = domain::diff(guild.last_snapshot.as_deref(), Some(&fetched))
            .map_err(|e| HeraldError::from_diff(guild_id, e))?;
        let lines = domain::format(&diff);

        let mut outcome = CycleOutcome::default();
        if !lines.is_empty() {
            match self.dispatcher.dispatch(guild.channel_id, &lines).await {
                Ok(()) => outcome.lines_announced = lines.len(),
                Err(err) => {
                    tracing::warn!(
                        %guild_id,
                        channel_id = %guild.channel_id,
                        error = %err,
                        "announcement dispatch failed; advancing baseline anyway"
                    );
                    outcome.dispatch_error = Some(err.to_string());
                }
            }
        }

        self.store.save_snapshot(guild_id, &fetched).await?;

        tracing::debug!(
            %guild_id,
            leaderboard_id = %guild.leaderboard_id,
            joined = diff.joined.len(),
            early_stars = diff.early_stars.len(),
            plain_stars = diff.plain_stars.len(),
            "guild cycle complete"
        );
        Ok(outcome)
    }
}
