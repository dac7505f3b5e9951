//! AniList GraphQL client for batched airing schedule lookups.

use super::query::AliasPlan;
use super::types::{GraphQLResponse, MediaSchedule};
use crate::error::ScheduleFetchError;
use anyhow::{Context, Result};
use reqwest::{header, Client};
use serde_json::{Map, Value};
use shared::AiringScheduleEntry;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Next airing episode per MAL id; `None` means no upcoming episode is known
pub type ScheduleMap = HashMap<u32, Option<AiringScheduleEntry>>;

/// AniList GraphQL client
#[derive(Debug, Clone)]
pub struct AniListClient {
    /// HTTP client
    client: Client,
    /// GraphQL endpoint
    endpoint: String,
}

impl AniListClient {
    /// Create a new schedule client with its own HTTP client
    pub fn new(endpoint: String, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, endpoint))
    }

    /// Create a schedule client that shares an existing HTTP client
    pub fn with_client(client: Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }

    /// Fetch schedules for a batch of ids in one request
    ///
    /// An empty batch returns immediately without touching the network.
    /// Sub-results that fail to decode map to `None` without failing the
    /// batch; only transport or top-level decoding failures are errors.
    pub async fn try_fetch_batch(&self, ids: &[u32]) -> Result<ScheduleMap, ScheduleFetchError> {
        let plan = AliasPlan::new(ids);
        if plan.is_empty() {
            debug!("No ids requested, skipping schedule request");
            return Ok(ScheduleMap::new());
        }

        debug!(
            endpoint = %self.endpoint,
            ids = plan.len(),
            "Requesting airing schedules"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&plan.request_body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScheduleFetchError::Status(status));
        }

        let body = response.text().await?;
        let parsed: GraphQLResponse = serde_json::from_str(&body)?;

        for err in &parsed.errors {
            debug!(status = ?err.status, message = %err.message, "GraphQL error reported");
        }

        let data = parsed.data.ok_or(ScheduleFetchError::MissingData)?;
        Ok(decode_batch(&plan, &data))
    }

    /// Fetch schedules, mapping every requested id to `None` on failure
    pub async fn fetch_batch(&self, ids: &[u32]) -> ScheduleMap {
        match self.try_fetch_batch(ids).await {
            Ok(schedules) => {
                let found = schedules.values().filter(|s| s.is_some()).count();
                info!(
                    requested = schedules.len(),
                    found = found,
                    "Fetched airing schedules"
                );
                schedules
            }
            Err(e) => {
                error!(error = %e, "Schedule request failed, treating all as unscheduled");
                let plan = AliasPlan::new(ids);
                plan.ids().map(|id| (id, None)).collect()
            }
        }
    }
}

/// Decode each id's aliased sub-result, isolating per-id failures
pub fn decode_batch(plan: &AliasPlan, data: &Map<String, Value>) -> ScheduleMap {
    plan.pairs()
        .iter()
        .map(|(id, alias)| {
            let schedule = match data.get(alias) {
                None | Some(Value::Null) => None,
                Some(value) => match serde_json::from_value::<MediaSchedule>(value.clone()) {
                    Ok(media) => media.next_episode(),
                    Err(e) => {
                        warn!(mal_id = *id, alias = %alias, error = %e, "Failed to decode schedule");
                        None
                    }
                },
            };

            if let Some(next) = &schedule {
                debug!(mal_id = *id, episode = ?next.episode, "Found next episode");
            }

            (*id, schedule)
        })
        .collect()
}
