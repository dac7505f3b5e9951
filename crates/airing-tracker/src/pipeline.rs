//! Pipeline orchestrator.
//!
//! Coordinates one refresh: read the user's list, look up schedules for the
//! entries that can still air, and merge the two. Both sources degrade to
//! empty results on their own, so the only errors surfaced here are a
//! missing username, client setup, and unexpected panics caught at this
//! boundary.

use crate::anilist::AniListClient;
use crate::error::PipelineError;
use crate::mal::MalListClient;
use crate::merge::{merge, schedulable_ids};
use futures::FutureExt;
use reqwest::Client;
use shared::config::normalize_username;
use shared::{CombinedAnimeRecord, Config, WatchStatus};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{error, info};

/// Counters for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub list_entries: usize,
    pub schedulable: usize,
    pub schedules_found: usize,
    pub records: usize,
}

/// List source + schedule source + merge
#[derive(Debug, Clone)]
pub struct AiringPipeline {
    list_client: MalListClient,
    schedule_client: AniListClient,
}

impl AiringPipeline {
    /// Create a pipeline from existing clients
    pub fn new(list_client: MalListClient, schedule_client: AniListClient) -> Self {
        Self {
            list_client,
            schedule_client,
        }
    }

    /// Build both clients from configuration, sharing one HTTP client
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .user_agent(config.http.user_agent.as_str())
            .build()
            .map_err(|e| PipelineError::Client(e.to_string()))?;

        Ok(Self::new(
            MalListClient::with_client(client.clone(), config.mal.base_url.clone()),
            AniListClient::with_client(client, config.anilist.endpoint.clone()),
        ))
    }

    /// Run one refresh for `username`
    ///
    /// Fetches watching entries, plus plan-to-watch when requested, then a
    /// single schedule batch for the distinct ids that can still air.
    pub async fn run(
        &self,
        username: &str,
        include_plan_to_watch: bool,
    ) -> Result<Vec<CombinedAnimeRecord>, PipelineError> {
        let username = normalize_username(username).ok_or(PipelineError::InvalidUsername)?;

        let (records, stats) = guarded(self.run_stages(username, include_plan_to_watch)).await?;

        info!(
            username = username,
            list_entries = stats.list_entries,
            schedulable = stats.schedulable,
            schedules_found = stats.schedules_found,
            records = stats.records,
            "Pipeline complete"
        );

        Ok(records)
    }

    async fn run_stages(
        &self,
        username: &str,
        include_plan_to_watch: bool,
    ) -> (Vec<CombinedAnimeRecord>, PipelineStats) {
        let mut stats = PipelineStats::default();

        // Phase 1: list entries
        let entries = if include_plan_to_watch {
            self.list_client.fetch_all(username).await
        } else {
            self.list_client
                .fetch_by_status(username, WatchStatus::Watching)
                .await
        };
        stats.list_entries = entries.len();

        // Phase 2: one schedule batch for everything that can still air
        let ids = schedulable_ids(&entries);
        stats.schedulable = ids.len();
        let schedules = self.schedule_client.fetch_batch(&ids).await;
        stats.schedules_found = schedules.values().filter(|s| s.is_some()).count();

        // Phase 3: join and order
        let records = merge(&entries, &schedules);
        stats.records = records.len();

        (records, stats)
    }
}

/// Run a refresh with configuration passed in explicitly
pub async fn run(
    config: &Config,
    username: &str,
    include_plan_to_watch: bool,
) -> Result<Vec<CombinedAnimeRecord>, PipelineError> {
    AiringPipeline::from_config(config)?
        .run(username, include_plan_to_watch)
        .await
}

/// Convert a panic escaping `fut` into a `PipelineError`
async fn guarded<F, T>(fut: F) -> Result<T, PipelineError>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(fut).catch_unwind().await.map_err(|panic| {
        let message = panic_message(panic.as_ref());
        error!(error = %message, "Pipeline panicked");
        PipelineError::Internal(message)
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown error".to_string()
    }
}
