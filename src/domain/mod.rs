//! Domain layer: snapshot model, diff engine, and announcement formatter.
//!
//! Everything in here is pure and synchronous. Fetching, dispatching,
//! and persistence live behind the traits in [`crate::clients`] and
//! [`crate::persistence`].

pub mod announcement;
pub mod diff;
pub mod guild;
pub mod ids;
pub mod snapshot;

pub use announcement::format;
pub use diff::{DiffResult, EarlyStarEvent, Rank, diff, diff_snapshots};
pub use guild::GuildConfig;
pub use ids::{ChannelId, GuildId, LeaderboardId, MemberId};
pub use snapshot::{AchievementRecord, Level, Member, Snapshot, StarEvent};
