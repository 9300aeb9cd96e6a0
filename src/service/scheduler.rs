//! Fixed-interval scheduler fanning one cycle out per guild.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use super::GuildCycle;
use crate::domain::GuildId;
use crate::error::HeraldError;

/// Summary of one tick across all guilds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Guilds loaded from the store.
    pub guilds: usize,
    /// Cycles that reached the persist step.
    pub succeeded: usize,
    /// Cycles that failed before persisting.
    pub failed: usize,
    /// Successful cycles whose dispatch failed.
    pub dispatch_failures: usize,
    /// Lines delivered across all guilds.
    pub lines_announced: usize,
}

/// Drives [`GuildCycle`] for every registered guild on a fixed interval.
///
/// Guild cycles within a tick run concurrently on a [`JoinSet`]; a failure
/// in one never affects the others or the loop. Ticks never overlap: a
/// slow tick delays the next one.
#[derive(Debug)]
pub struct Scheduler {
    cycle: Arc<GuildCycle>,
    interval: Duration,
}

impl Scheduler {
    /// Creates a scheduler ticking every `interval`.
    #[must_use]
    pub fn new(cycle: Arc<GuildCycle>, interval: Duration) -> Self {
        Self { cycle, interval }
    }

    /// Ticks until `shutdown` turns `true` or its sender is dropped.
    ///
    /// Shutdown is observed between ticks, so an in-flight tick always
    /// runs every guild cycle to completion.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(interval_secs = self.interval.as_secs(), "scheduler started");

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }
            self.tick().await;
        }

        tracing::info!("scheduler stopped");
    }

    /// Runs one cycle for every registered guild and waits for all of them.
    pub async fn tick(&self) -> TickReport {
        let guilds = match self.cycle.store().list_guilds().await {
            Ok(guilds) => guilds,
            Err(err) => {
                tracing::error!(error = %err, "failed to load guilds; skipping tick");
                return TickReport::default();
            }
        };

        let mut report = TickReport {
            guilds: guilds.len(),
            ..TickReport::default()
        };

        let mut tasks = JoinSet::new();
        for guild in guilds {
            let cycle = Arc::clone(&self.cycle);
            tasks.spawn(async move {
                let result = cycle.run(&guild).await;
                (guild.guild_id, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(outcome))) => {
                    report.succeeded += 1;
                    report.lines_announced += outcome.lines_announced;
                    if outcome.dispatch_error.is_some() {
                        report.dispatch_failures += 1;
                    }
                }
                Ok((guild_id, Err(err))) => {
                    report.failed += 1;
                    log_cycle_failure(guild_id, &err);
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::error!(error = %err, "guild cycle task aborted");
                }
            }
        }

        tracing::info!(
            guilds = report.guilds,
            succeeded = report.succeeded,
            failed = report.failed,
            dispatch_failures = report.dispatch_failures,
            lines_announced = report.lines_announced,
            "tick complete"
        );
        report
    }
}

fn log_cycle_failure(guild_id: GuildId, err: &HeraldError) {
    match err {
        HeraldError::Fetch(_) | HeraldError::MalformedSnapshot { .. } => {
            tracing::warn!(%guild_id, error = %err, "guild cycle skipped; retrying next tick");
        }
        HeraldError::CorruptBaseline { .. } => {
            tracing::error!(
                %guild_id,
                error = %err,
                "stored baseline is corrupt; refusing to reset history"
            );
        }
        _ => {
            tracing::error!(%guild_id, error = %err, "guild cycle failed");
        }
    }
}
