//! Shared fixtures: leaderboard JSON builders and collaborator doubles.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;

use aoc_herald::clients::{AnnouncementDispatcher, SnapshotFetcher};
use aoc_herald::domain::{ChannelId, LeaderboardId};
use aoc_herald::error::HeraldError;

/// One member entry with `(day, level, timestamp)` stars.
pub fn member(name: &str, stars: &[(u32, u8, i64)]) -> Value {
    let mut days = Map::new();
    for (day, level, ts) in stars {
        let entry = days.entry(day.to_string()).or_insert_with(|| json!({}));
        if let Some(levels) = entry.as_object_mut() {
            levels.insert(level.to_string(), json!({ "get_star_ts": ts }));
        }
    }
    json!({ "name": name, "local_score": 0, "completion_day_level": days })
}

/// Raw leaderboard body with the given `(member id, member)` pairs.
pub fn board(members: &[(&str, Value)]) -> String {
    let map: Map<String, Value> = members
        .iter()
        .map(|(id, m)| ((*id).to_string(), m.clone()))
        .collect();
    json!({ "event": "2020", "owner_id": "1", "members": map }).to_string()
}

/// Fetcher returning a canned body (or failure) per leaderboard.
#[derive(Debug, Default)]
pub struct StubFetcher {
    bodies: Mutex<HashMap<LeaderboardId, Result<String, String>>>,
}

impl StubFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn respond(&self, leaderboard_id: LeaderboardId, body: impl Into<String>) {
        self.bodies
            .lock()
            .await
            .insert(leaderboard_id, Ok(body.into()));
    }

    pub async fn fail(&self, leaderboard_id: LeaderboardId, reason: &str) {
        self.bodies
            .lock()
            .await
            .insert(leaderboard_id, Err(reason.to_string()));
    }
}

#[async_trait]
impl SnapshotFetcher for StubFetcher {
    async fn fetch(&self, leaderboard_id: LeaderboardId) -> Result<String, HeraldError> {
        match self.bodies.lock().await.get(&leaderboard_id) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => Err(HeraldError::Fetch(reason.clone())),
            None => Err(HeraldError::Fetch(format!("no stub for {leaderboard_id}"))),
        }
    }
}

/// Dispatcher that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    calls: Mutex<Vec<(ChannelId, Vec<String>)>>,
    failing: Mutex<bool>,
}

impl RecordingDispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.lock().await = failing;
    }

    pub async fn calls(&self) -> Vec<(ChannelId, Vec<String>)> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl AnnouncementDispatcher for RecordingDispatcher {
    async fn dispatch(&self, channel_id: ChannelId, lines: &[String]) -> Result<(), HeraldError> {
        self.calls.lock().await.push((channel_id, lines.to_vec()));
        if *self.failing.lock().await {
            return Err(HeraldError::Dispatch("channel unavailable".to_string()));
        }
        Ok(())
    }
}
