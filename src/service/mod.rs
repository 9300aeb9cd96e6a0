//! Service layer: per-guild cycle orchestration and the tick loop.
//!
//! [`GuildCycle`] runs one guild's fetch → diff → format → dispatch →
//! persist sequence; [`Scheduler`] fires it for every guild each tick.

pub mod cycle;
pub mod scheduler;

pub use cycle::{CycleOutcome, GuildCycle};
pub use scheduler::{Scheduler, TickReport};
