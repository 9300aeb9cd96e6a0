//! Data Transfer Objects for REST request/response serialization.
//!
//! Snowflake ids travel as plain JSON numbers.

pub mod guild_dto;

pub use guild_dto::*;
