//! Announcement dispatcher posting to Discord channels over REST.
//!
//! Lines are joined with newlines and split into as few messages as the
//! per-message limit allows, always at line boundaries unless a single
//! line is itself over the limit.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use super::AnnouncementDispatcher;
use super::aoc::USER_AGENT;
use crate::domain::ChannelId;
use crate::error::HeraldError;

/// Maximum characters in one chat message.
pub const MESSAGE_LIMIT: usize = 2000;

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Bot-authenticated client for `POST /channels/{id}/messages`.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl DiscordClient {
    /// Builds a client authenticated with the given bot token.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::Internal`] if the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, HeraldError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HeraldError::Internal(e.to_string()))?;
        Ok(Self {
            http,
            api_base: api_base.into(),
            token: token.into(),
        })
    }

    /// URL messages for `channel_id` are posted to.
    #[must_use]
    pub fn messages_url(&self, channel_id: ChannelId) -> String {
        format!("{}/channels/{}/messages", self.api_base, channel_id)
    }
}

impl fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AnnouncementDispatcher for DiscordClient {
    async fn dispatch(&self, channel_id: ChannelId, lines: &[String]) -> Result<(), HeraldError> {
        let url = self.messages_url(channel_id);
        let chunks = chunk_message(lines, MESSAGE_LIMIT);
        for (index, content) in chunks.iter().enumerate() {
            let response = self
                .http
                .post(&url)
                .header(AUTHORIZATION, format!("Bot {}", self.token))
                .json(&CreateMessage { content })
                .send()
                .await
                .map_err(|e| HeraldError::Dispatch(format!("channel {channel_id}: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(HeraldError::Dispatch(format!(
                    "channel {channel_id} rejected message {} of {}: {status}",
                    index + 1,
                    chunks.len()
                )));
            }
        }
        tracing::debug!(
            %channel_id,
            lines = lines.len(),
            messages = chunks.len(),
            "announcement posted"
        );
        Ok(())
    }
}

/// Packs lines into newline-joined messages of at most `limit` characters.
#[must_use]
pub fn chunk_message(lines: &[String], limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in lines {
        for piece in split_long_line(line, limit) {
            let piece_len = piece.chars().count();
            if !current.is_empty() && current_len + 1 + piece_len > limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if !current.is_empty() {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_long_line(line: &str, limit: usize) -> Vec<String> {
    if line.chars().count() <= limit {
        return vec![line.to_string()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars.chunks(limit).map(|piece| piece.iter().collect()).collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn short_announcement_is_one_message() {
        let chunks = chunk_message(&lines(&["a", "b", "c"]), MESSAGE_LIMIT);
        assert_eq!(chunks, vec!["a\nb\nc".to_string()]);
    }

    #[test]
    fn splits_at_line_boundaries() {
        // "aaaa\nbbbb" is 9 chars; a limit of 9 fits two lines, not three.
        let chunks = chunk_message(&lines(&["aaaa", "bbbb", "cccc"]), 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn overlong_line_is_hard_split() {
        let chunks = chunk_message(&lines(&["abcdefg"]), 3);
        assert_eq!(
            chunks,
            vec!["abc".to_string(), "def".to_string(), "g".to_string()]
        );
    }

    #[test]
    fn multibyte_text_counts_characters() {
        let chunks = chunk_message(&lines(&["★★", "★★"]), 5);
        assert_eq!(chunks, vec!["★★\n★★".to_string()]);
    }

    #[test]
    fn nothing_to_send() {
        assert!(chunk_message(&[], MESSAGE_LIMIT).is_empty());
    }

    #[test]
    fn builds_messages_url() {
        let Ok(client) = DiscordClient::new(
            "https://discord.com/api/v10",
            "bot-secret",
            Duration::from_secs(1),
        ) else {
            panic!("client should build");
        };
        assert_eq!(
            client.messages_url(ChannelId::new(55)),
            "https://discord.com/api/v10/channels/55/messages"
        );
        assert!(!format!("{client:?}").contains("bot-secret"));
    }
}
