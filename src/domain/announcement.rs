//! Announcement formatting.
//!
//! Turns a [`DiffResult`] into chat lines: joins first, then early stars,
//! then plain stars. Every line is a standalone sentence.

use super::diff::{DiffResult, EarlyStarEvent};
use super::snapshot::{Member, StarEvent};

/// Formats every event in `diff` as one line, in announcement order.
///
/// An empty result means there is nothing to dispatch.
#[must_use]
pub fn format(diff: &DiffResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(diff.event_count());
    lines.extend(diff.joined.iter().map(join_line));
    lines.extend(diff.early_stars.iter().map(|early| early_line(diff, early)));
    lines.extend(diff.plain_stars.iter().map(|star| plain_line(diff, star)));
    lines
}

fn join_line(member: &Member) -> String {
    format!("User {} joined the leaderboard!", member.display_name())
}

fn early_line(diff: &DiffResult, early: &EarlyStarEvent) -> String {
    format!(
        "{} was {} to win the {} star from day {}!",
        diff.display_name(&early.star.member_id),
        early.rank.as_str(),
        early.star.level.star_name(),
        early.star.day
    )
}

fn plain_line(diff: &DiffResult, star: &StarEvent) -> String {
    format!(
        "{} won the {} star from day {}!",
        diff.display_name(&star.member_id),
        star.level.star_name(),
        star.day
    )
}
