//! Outbound collaborators: leaderboard fetch and announcement dispatch.
//!
//! The coordinator only sees the [`SnapshotFetcher`] and
//! [`AnnouncementDispatcher`] traits, so tests can substitute doubles for
//! the HTTP-backed [`AocClient`] and [`DiscordClient`].

pub mod aoc;
pub mod discord;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{ChannelId, LeaderboardId};
use crate::error::HeraldError;

pub use aoc::AocClient;
pub use discord::DiscordClient;

/// Fetches the raw snapshot body of a leaderboard.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync + fmt::Debug {
    /// Returns the raw snapshot text, unparsed.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::Fetch`] on transport failure or a
    /// non-success HTTP status.
    async fn fetch(&self, leaderboard_id: LeaderboardId) -> Result<String, HeraldError>;
}

/// Delivers announcement lines to a channel as one logical message.
#[async_trait]
pub trait AnnouncementDispatcher: Send + Sync + fmt::Debug {
    /// Joins `lines` with newlines and posts them to `channel_id`.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::Dispatch`] if delivery fails.
    async fn dispatch(&self, channel_id: ChannelId, lines: &[String]) -> Result<(), HeraldError>;
}
