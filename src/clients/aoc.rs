//! Leaderboard fetcher for the Advent of Code private leaderboard API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::COOKIE;

use super::SnapshotFetcher;
use crate::domain::LeaderboardId;
use crate::error::HeraldError;

/// User agent sent with every leaderboard request.
pub const USER_AGENT: &str = concat!(
    "aoc-herald/",
    env!("CARGO_PKG_VERSION"),
    " (private leaderboard announcer)"
);

/// HTTP client for `/{year}/leaderboard/private/view/{id}.json`.
#[derive(Clone)]
pub struct AocClient {
    http: reqwest::Client,
    base_url: String,
    event_year: i32,
    session: String,
}

impl AocClient {
    /// Builds a client authenticated with the given session cookie.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::Internal`] if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        event_year: i32,
        session: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HeraldError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HeraldError::Internal(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            event_year,
            session: session.into(),
        })
    }

    /// URL of the JSON view of a private leaderboard.
    #[must_use]
    pub fn leaderboard_url(&self, leaderboard_id: LeaderboardId) -> String {
        format!(
            "{}/{}/leaderboard/private/view/{}.json",
            self.base_url, self.event_year, leaderboard_id
        )
    }
}

impl fmt::Debug for AocClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AocClient")
            .field("base_url", &self.base_url)
            .field("event_year", &self.event_year)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SnapshotFetcher for AocClient {
    async fn fetch(&self, leaderboard_id: LeaderboardId) -> Result<String, HeraldError> {
        let url = self.leaderboard_url(leaderboard_id);
        let response = self
            .http
            .get(&url)
            .header(COOKIE, format!("session={}", self.session))
            .send()
            .await
            .map_err(|e| HeraldError::Fetch(format!("leaderboard {leaderboard_id}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HeraldError::Fetch(format!(
                "leaderboard {leaderboard_id} returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HeraldError::Fetch(format!("leaderboard {leaderboard_id}: {e}")))?;
        tracing::debug!(%leaderboard_id, bytes = body.len(), "leaderboard fetched");
        Ok(body)
    }
}
