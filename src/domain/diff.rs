//! Snapshot diff engine.
//!
//! [`diff`] compares the previous and current leaderboard snapshots and
//! classifies what happened since the last poll:
//!
//! - members who joined (reported once, without their backfilled stars),
//! - early stars: the first three earners of a (day, level), ranked over
//!   the full current history and announced only when new,
//! - plain stars: every other new star.
//!
//! Each new star is reported exactly once, as either early or plain. The
//! engine is pure: no I/O and no state between calls.

use std::collections::{BTreeMap, HashSet};

use super::snapshot::{Level, Member, Snapshot, StarEvent};
use super::MemberId;
use crate::error::DiffError;

/// Number of ranked places in each (day, level) race.
const PODIUM_SIZE: usize = 3;

/// Place in the race for one (day, level).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// Earliest earner.
    First,
    /// Second earner.
    Second,
    /// Third earner.
    Third,
}

impl Rank {
    /// Maps a zero-based position in the timestamp order to a rank.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::First),
            1 => Some(Self::Second),
            2 => Some(Self::Third),
            _ => None,
        }
    }

    /// Ordinal word used in announcements.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
        }
    }
}

/// A new star that placed in the top three for its (day, level).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarlyStarEvent {
    /// Place among all earners of this (day, level).
    pub rank: Rank,
    /// The star itself.
    pub star: StarEvent,
}

/// Classified changes between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Members present now but absent from the previous snapshot.
    pub joined: Vec<Member>,
    /// New ranked stars, ordered by (day, level, rank).
    pub early_stars: Vec<EarlyStarEvent>,
    /// New unranked stars, ordered by (timestamp, member, day, level).
    pub plain_stars: Vec<StarEvent>,
    /// Display names of the members referenced by star events.
    pub names: BTreeMap<MemberId, String>,
}

impl DiffResult {
    /// Returns `true` when there is nothing to announce.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.early_stars.is_empty() && self.plain_stars.is_empty()
    }

    /// Total number of classified events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.joined.len() + self.early_stars.len() + self.plain_stars.len()
    }

    /// Name to announce for a member referenced by a star event.
    #[must_use]
    pub fn display_name(&self, id: &MemberId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("anonymous user #{id}"))
    }
}

/// Parses both raw snapshots and diffs them.
///
/// An absent previous snapshot means this is the first poll: every member
/// in `current` is reported as joined and no stars are announced.
///
/// # Errors
///
/// Returns [`DiffError::Previous`] or [`DiffError::Current`] when the
/// corresponding snapshot is present but malformed. A malformed snapshot
/// is never treated as empty.
pub fn diff(previous_raw: Option<&str>, current_raw: Option<&str>) -> Result<DiffResult, DiffError> {
    let previous = Snapshot::parse(previous_raw).map_err(DiffError::Previous)?;
    let current = Snapshot::parse(current_raw).map_err(DiffError::Current)?;
    Ok(diff_snapshots(&previous, &current))
}

/// Diffs two already-parsed snapshots.
#[must_use]
pub fn diff_snapshots(previous: &Snapshot, current: &Snapshot) -> DiffResult {
    let joined: Vec<Member> = current
        .members
        .values()
        .filter(|member| !previous.contains(&member.id))
        .cloned()
        .collect();
    let joined_ids: HashSet<&MemberId> = joined.iter().map(|member| &member.id).collect();

    let old_stars: HashSet<StarEvent> = previous.flatten().into_iter().collect();
    let new_stars = current.flatten();

    // New this cycle and not a joiner's backfill.
    let announceable =
        |star: &StarEvent| !old_stars.contains(star) && !joined_ids.contains(&star.member_id);

    let early_stars: Vec<EarlyStarEvent> = rank_early_stars(&new_stars)
        .into_iter()
        .filter(|(_, star)| announceable(*star))
        .map(|(rank, star)| EarlyStarEvent {
            rank,
            star: star.clone(),
        })
        .collect();

    let early_slots: HashSet<(&MemberId, u32, Level)> =
        early_stars.iter().map(|early| early.star.slot()).collect();

    let mut plain_stars: Vec<StarEvent> = new_stars
        .iter()
        .filter(|star| announceable(*star) && !early_slots.contains(&star.slot()))
        .cloned()
        .collect();
    plain_stars.sort_by(|a, b| {
        a.earned_at
            .cmp(&b.earned_at)
            .then_with(|| a.member_id.cmp(&b.member_id))
            .then_with(|| a.day.cmp(&b.day))
            .then_with(|| a.level.cmp(&b.level))
    });

    let names = early_stars
        .iter()
        .map(|early| &early.star.member_id)
        .chain(plain_stars.iter().map(|star| &star.member_id))
        .filter_map(|id| current.member(id))
        .map(|member| (member.id.clone(), member.display_name()))
        .collect();

    DiffResult {
        joined,
        early_stars,
        plain_stars,
        names,
    }
}

/// Ranks the first [`PODIUM_SIZE`] earners of every (day, level).
///
/// Ties on timestamp are broken by member id so the ranking is
/// reproducible. Output is ordered by (day, level, rank).
fn rank_early_stars(stars: &[StarEvent]) -> Vec<(Rank, &StarEvent)> {
    let mut races: BTreeMap<(u32, Level), Vec<&StarEvent>> = BTreeMap::new();
    for star in stars {
        races.entry((star.day, star.level)).or_default().push(star);
    }

    races
        .into_values()
        .flat_map(|mut race| {
            race.sort_by(|a, b| {
                a.earned_at
                    .cmp(&b.earned_at)
                    .then_with(|| a.member_id.cmp(&b.member_id))
            });
            race.into_iter()
                .take(PODIUM_SIZE)
                .enumerate()
                .filter_map(|(index, star)| Rank::from_index(index).map(|rank| (rank, star)))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member(name: &str, stars: &[(u32, u8, i64)]) -> serde_json::Value {
        let mut days = serde_json::Map::new();
        for (day, level, ts) in stars {
            let entry = days
                .entry(day.to_string())
                .or_insert_with(|| json!({}));
            if let Some(levels) = entry.as_object_mut() {
                levels.insert(level.to_string(), json!({ "get_star_ts": ts }));
            }
        }
        json!({ "name": name, "completion_day_level": days })
    }

    fn board(members: &[(&str, serde_json::Value)]) -> String {
        let map: serde_json::Map<String, serde_json::Value> = members
            .iter()
            .map(|(id, m)| ((*id).to_string(), m.clone()))
            .collect();
        json!({ "members": map }).to_string()
    }

    fn run(previous: Option<&str>, current: &str) -> DiffResult {
        let Ok(result) = diff(previous, Some(current)) else {
            panic!("diff should succeed");
        };
        result
    }

    #[test]
    fn identical_snapshots_produce_nothing() {
        let snap = board(&[("1", member("Ada", &[(1, 1, 100), (1, 2, 150)]))]);
        let result = run(Some(&snap), &snap);
        assert!(result.is_empty());
        assert_eq!(result.event_count(), 0);
    }

    #[test]
    fn rank_ties_break_by_member_id() {
        let before = board(&[("b", member("B", &[])), ("a", member("A", &[]))]);
        let after = board(&[
            ("b", member("B", &[(2, 1, 500)])),
            ("a", member("A", &[(2, 1, 500)])),
        ]);
        let result = run(Some(&before), &after);
        let ranked: Vec<(Rank, &str)> = result
            .early_stars
            .iter()
            .map(|e| (e.rank, e.star.member_id.as_str()))
            .collect();
        assert_eq!(ranked, vec![(Rank::First, "a"), (Rank::Second, "b")]);
    }

    #[test]
    fn historical_rank_is_kept_for_late_star() {
        // Two members already hold day 1 silver; a third earns it now and
        // is announced as third, not first.
        let before = board(&[
            ("1", member("Ada", &[(1, 1, 100)])),
            ("2", member("Bo", &[(1, 1, 200)])),
            ("3", member("Cy", &[])),
        ]);
        let after = board(&[
            ("1", member("Ada", &[(1, 1, 100)])),
            ("2", member("Bo", &[(1, 1, 200)])),
            ("3", member("Cy", &[(1, 1, 900)])),
        ]);
        let result = run(Some(&before), &after);
        assert_eq!(result.early_stars.len(), 1);
        assert_eq!(result.early_stars.first().map(|e| e.rank), Some(Rank::Third));
        assert!(result.plain_stars.is_empty());
        assert_eq!(result.display_name(&MemberId::from("3")), "Cy");
    }

    #[test]
    fn plain_stars_are_chronological() {
        let before = board(&[
            ("1", member("Ada", &[(1, 1, 1), (1, 2, 2)])),
            ("2", member("Bo", &[(1, 1, 3), (1, 2, 4)])),
            ("3", member("Cy", &[(1, 1, 5), (1, 2, 6)])),
            ("4", member("Di", &[])),
        ]);
        let after = board(&[
            ("1", member("Ada", &[(1, 1, 1), (1, 2, 2)])),
            ("2", member("Bo", &[(1, 1, 3), (1, 2, 4)])),
            ("3", member("Cy", &[(1, 1, 5), (1, 2, 6)])),
            ("4", member("Di", &[(1, 2, 80), (1, 1, 70)])),
        ]);
        let result = run(Some(&before), &after);
        assert!(result.early_stars.is_empty());
        let order: Vec<(Level, i64)> = result
            .plain_stars
            .iter()
            .map(|s| (s.level, s.earned_at))
            .collect();
        assert_eq!(order, vec![(Level::One, 70), (Level::Two, 80)]);
    }

    #[test]
    fn departed_member_is_ignored() {
        let before = board(&[("1", member("Ada", &[(1, 1, 100)])), ("2", member("Bo", &[]))]);
        let after = board(&[("2", member("Bo", &[]))]);
        assert!(run(Some(&before), &after).is_empty());
    }

    #[test]
    fn malformed_sides_are_reported_separately() {
        let good = board(&[("1", member("Ada", &[]))]);
        assert!(matches!(
            diff(Some("not json"), Some(&good)),
            Err(DiffError::Previous(_))
        ));
        assert!(matches!(
            diff(Some(&good), Some("{\"members\": 3}")),
            Err(DiffError::Current(_))
        ));
    }

    #[test]
    fn rank_from_index_stops_at_third() {
        assert_eq!(Rank::from_index(2), Some(Rank::Third));
        assert_eq!(Rank::from_index(3), None);
        assert_eq!(Rank::Second.as_str(), "second");
    }
}
