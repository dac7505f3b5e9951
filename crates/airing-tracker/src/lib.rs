//! Currently-airing anime for a MyAnimeList user.
//!
//! This library reads a user's public MAL list, looks up the next episode of
//! each show on AniList in one batched GraphQL request, and merges the two
//! into an ordered list ready for display.

pub mod anilist;
pub mod error;
pub mod mal;
pub mod merge;
pub mod pipeline;
pub mod render;

pub use anilist::{AniListClient, ScheduleMap};
pub use error::{ListFetchError, PipelineError, ScheduleFetchError};
pub use mal::MalListClient;
pub use merge::merge;
pub use pipeline::{run, AiringPipeline, PipelineStats};
