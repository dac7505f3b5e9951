//! AniList GraphQL response types.

use serde::Deserialize;
use serde_json::{Map, Value};
use shared::AiringScheduleEntry;

/// Top-level GraphQL response
///
/// `data` stays loosely typed so a malformed sub-result only loses its own
/// id. `errors` is informational: AniList reports unknown ids there while
/// still answering the rest of the batch.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

/// One aliased `Media` result
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSchedule {
    pub airing_schedule: Option<ScheduleConnection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConnection {
    #[serde(default)]
    pub nodes: Vec<AiringScheduleEntry>,
}

impl MediaSchedule {
    /// First upcoming node, if any
    pub fn next_episode(self) -> Option<AiringScheduleEntry> {
        self.airing_schedule
            .and_then(|connection| connection.nodes.into_iter().next())
    }
}
