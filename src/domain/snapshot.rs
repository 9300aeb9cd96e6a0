//! Leaderboard snapshot model: parsing and flattening.
//!
//! A [`Snapshot`] is the full leaderboard state at one poll. It is parsed
//! from the raw JSON returned by the remote service and flattened into
//! [`StarEvent`]s for diffing. Absent fields mean "not yet earned"; a body
//! that does not have the leaderboard shape is a [`SnapshotError`].

use std::collections::BTreeMap;

use serde::Deserialize;

use super::MemberId;
use crate::error::SnapshotError;

/// Puzzle part of a day. Part one awards the silver star, part two the
/// gold star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Level `"1"`: the silver star.
    One,
    /// Level `"2"`: the gold star.
    Two,
}

impl Level {
    /// Maps a `completion_day_level` key to a level. Unknown keys yield
    /// `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            _ => None,
        }
    }

    /// Returns the star colour announced for this level.
    #[must_use]
    pub const fn star_name(self) -> &'static str {
        match self {
            Self::One => "silver",
            Self::Two => "gold",
        }
    }
}

/// One earned (day, level) achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementRecord {
    /// Epoch seconds at which the star was earned.
    pub earned_at: i64,
}

/// One leaderboard participant and the stars they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Key of the member in the snapshot's `members` map.
    pub id: MemberId,
    /// Display name; `None` for anonymous participants.
    pub name: Option<String>,
    /// Day number → level → achievement. A pair is present only once
    /// earned.
    pub achievements: BTreeMap<u32, BTreeMap<Level, AchievementRecord>>,
}

impl Member {
    /// Name used in announcements. Anonymous members are shown by id.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("anonymous user #{}", self.id),
        }
    }
}

/// Flattened achievement: `(member, day, level, timestamp)`.
///
/// Equality and hashing cover the full tuple, so a star whose timestamp
/// differs between snapshots is a different event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StarEvent {
    /// Member who earned the star.
    pub member_id: MemberId,
    /// Puzzle day.
    pub day: u32,
    /// Puzzle part.
    pub level: Level,
    /// Epoch seconds at which the star was earned.
    pub earned_at: i64,
}

impl StarEvent {
    /// Returns the `(member, day, level)` triple without the timestamp.
    #[must_use]
    pub fn slot(&self) -> (&MemberId, u32, Level) {
        (&self.member_id, self.day, self.level)
    }
}

/// Full leaderboard state at one point in time, keyed by member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Members ordered by identifier.
    pub members: BTreeMap<MemberId, Member>,
}

impl Snapshot {
    /// Parses an optional raw snapshot.
    ///
    /// `None` (no baseline yet) yields an empty snapshot. A present body
    /// is never degraded to empty: anything that does not have the
    /// leaderboard shape is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the body is not JSON, lacks the
    /// `members` map, has a non-numeric day key, or carries a timestamp
    /// that is not an integer.
    pub fn parse(raw: Option<&str>) -> Result<Self, SnapshotError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        let parsed: RawSnapshot = serde_json::from_str(raw)?;

        let mut members = BTreeMap::new();
        for (key, raw_member) in parsed.members {
            let id = MemberId::new(key);
            let achievements = parse_achievements(&id, raw_member.completion_day_level)?;
            members.insert(
                id.clone(),
                Member {
                    id,
                    name: raw_member.name,
                    achievements,
                },
            );
        }
        Ok(Self { members })
    }

    /// Emits one [`StarEvent`] per earned (member, day, level).
    #[must_use]
    pub fn flatten(&self) -> Vec<StarEvent> {
        self.members
            .values()
            .flat_map(|member| {
                member.achievements.iter().flat_map(move |(day, levels)| {
                    levels.iter().map(move |(level, record)| StarEvent {
                        member_id: member.id.clone(),
                        day: *day,
                        level: *level,
                        earned_at: record.earned_at,
                    })
                })
            })
            .collect()
    }

    /// Returns the member with the given id, if present.
    #[must_use]
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    /// Returns `true` if the given member is on the leaderboard.
    #[must_use]
    pub fn contains(&self, id: &MemberId) -> bool {
        self.members.contains_key(id)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the leaderboard has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// ── Wire shape ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawSnapshot {
    members: BTreeMap<String, RawMember>,
}

#[derive(Deserialize)]
struct RawMember {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    completion_day_level: Option<RawDays>,
}

/// Day key → level key → star. Days and levels may be `null`.
type RawDays = BTreeMap<String, Option<BTreeMap<String, Option<RawStar>>>>;

#[derive(Deserialize)]
struct RawStar {
    #[serde(default)]
    get_star_ts: Option<RawTimestamp>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Number(i64),
    Float(f64),
    Text(String),
}

impl RawTimestamp {
    /// Whole seconds, or `None` if the value is not an integer.
    fn seconds(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Some(*f as i64)
            }
            Self::Float(_) => None,
            Self::Text(text) => text.trim().parse::<i64>().ok(),
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

fn parse_achievements(
    member: &MemberId,
    raw: Option<RawDays>,
) -> Result<BTreeMap<u32, BTreeMap<Level, AchievementRecord>>, SnapshotError> {
    let mut days = BTreeMap::new();
    for (day_key, levels) in raw.unwrap_or_default() {
        let day: u32 = day_key
            .trim()
            .parse()
            .map_err(|_| SnapshotError::InvalidDay {
                member: member.to_string(),
                key: day_key.clone(),
            })?;
        let Some(levels) = levels else {
            continue;
        };

        let mut earned = BTreeMap::new();
        for (level_key, star) in levels {
            let Some(level) = Level::from_key(level_key.trim()) else {
                continue;
            };
            let Some(ts) = star.and_then(|s| s.get_star_ts) else {
                continue;
            };
            let earned_at = ts.seconds().ok_or_else(|| SnapshotError::InvalidTimestamp {
                member: member.to_string(),
                day,
                value: ts.render(),
            })?;
            earned.insert(level, AchievementRecord { earned_at });
        }

        if !earned.is_empty() {
            days.insert(day, earned);
        }
    }
    Ok(days)
}
