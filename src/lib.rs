//! # aoc-herald
//!
//! Watches Advent of Code private leaderboards and announces what changed
//! since the last poll to each subscribed guild's chat channel.
//!
//! Every tick, each guild's leaderboard is fetched and diffed against the
//! last stored snapshot. New participants, the first three finishers of
//! every puzzle part, and all other newly earned stars are formatted as
//! one line each and posted in a single message.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler (service/)          Admin API (api/)
//!     │ every tick, per guild        │ register / list guilds
//!     ▼                              │
//! GuildCycle (service/)              │
//!     ├── SnapshotFetcher ── AocClient (clients/)
//!     ├── diff + format (domain/)    │
//!     ├── AnnouncementDispatcher ── DiscordClient (clients/)
//!     └── GuildStore ◄───────────────┘
//!             ├── PostgresGuildStore (persistence/)
//!             └── InMemoryGuildStore (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
