//! AniList schedule source.
//!
//! Looks up the next unaired episode for a batch of MAL ids in a single
//! aliased GraphQL request.

pub mod client;
pub mod query;
pub mod types;

pub use client::{AniListClient, ScheduleMap};
pub use query::AliasPlan;
