//! Data models for the airing pipeline.
//!
//! This module defines the list rows scraped from a MyAnimeList profile,
//! the next-episode records reported by AniList, and the joined records
//! handed to whatever renders the result.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

/// Base URL for anime detail pages on MyAnimeList
pub const MAL_ANIME_URL: &str = "https://myanimelist.net/anime";

/// Broadcast lifecycle of an anime, as encoded in MAL list data
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "i64", into = "i64")]
pub enum AiringStatus {
    Airing,
    Finished,
    NotYetAired,
    Unknown(i64),
}

impl AiringStatus {
    /// Whether an entry with this status can have an upcoming episode
    pub fn is_upcoming(&self) -> bool {
        matches!(self, AiringStatus::Airing | AiringStatus::NotYetAired)
    }
}

impl From<i64> for AiringStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => AiringStatus::Airing,
            2 => AiringStatus::Finished,
            3 => AiringStatus::NotYetAired,
            other => AiringStatus::Unknown(other),
        }
    }
}

impl From<AiringStatus> for i64 {
    fn from(status: AiringStatus) -> Self {
        match status {
            AiringStatus::Airing => 1,
            AiringStatus::Finished => 2,
            AiringStatus::NotYetAired => 3,
            AiringStatus::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for AiringStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiringStatus::Airing => write!(f, "airing"),
            AiringStatus::Finished => write!(f, "finished"),
            AiringStatus::NotYetAired => write!(f, "not_yet_aired"),
            AiringStatus::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// User-assigned list status on MAL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "i64", into = "i64")]
pub enum WatchStatus {
    Watching,
    Completed,
    OnHold,
    Dropped,
    PlanToWatch,
    Unknown(i64),
}

impl WatchStatus {
    /// Numeric code used by the `status` query parameter of list pages
    pub fn code(&self) -> i64 {
        i64::from(*self)
    }
}

impl From<i64> for WatchStatus {
    fn from(code: i64) -> Self {
        match code {
            1 => WatchStatus::Watching,
            2 => WatchStatus::Completed,
            3 => WatchStatus::OnHold,
            4 => WatchStatus::Dropped,
            6 => WatchStatus::PlanToWatch,
            other => WatchStatus::Unknown(other),
        }
    }
}

impl From<WatchStatus> for i64 {
    fn from(status: WatchStatus) -> Self {
        match status {
            WatchStatus::Watching => 1,
            WatchStatus::Completed => 2,
            WatchStatus::OnHold => 3,
            WatchStatus::Dropped => 4,
            WatchStatus::PlanToWatch => 6,
            WatchStatus::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchStatus::Watching => write!(f, "watching"),
            WatchStatus::Completed => write!(f, "completed"),
            WatchStatus::OnHold => write!(f, "on_hold"),
            WatchStatus::Dropped => write!(f, "dropped"),
            WatchStatus::PlanToWatch => write!(f, "plan_to_watch"),
            WatchStatus::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// One row of a user's MAL anime list (from the `data-items` JSON)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnimeListEntry {
    pub anime_id: u32,
    #[serde(rename = "anime_title", deserialize_with = "string_or_number")]
    pub title: String,
    #[serde(rename = "anime_title_eng", default)]
    pub title_english: Option<String>,
    #[serde(rename = "anime_airing_status")]
    pub airing_status: AiringStatus,
    #[serde(rename = "status")]
    pub watch_status: WatchStatus,
    #[serde(rename = "num_watched_episodes", default)]
    pub watched_episodes: Option<u32>,
}

/// MAL emits some titles (e.g. "86") as bare JSON numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Title {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Title::deserialize(deserializer)? {
        Title::Text(text) => text,
        Title::Number(number) => number.to_string(),
    })
}

/// Next known airing event for one anime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AiringScheduleEntry {
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub airing_at: Option<i64>,
    #[serde(default)]
    pub time_until_airing: Option<i64>,
}

/// A list entry joined with its next airing episode (if any)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombinedAnimeRecord {
    pub entry: AnimeListEntry,
    pub episode: Option<u32>,
    pub airing_at: Option<i64>,
    pub time_until_airing: Option<i64>,
}

impl CombinedAnimeRecord {
    /// Join an entry with an optional schedule, copying the schedule fields
    pub fn new(entry: AnimeListEntry, schedule: Option<&AiringScheduleEntry>) -> Self {
        Self {
            entry,
            episode: schedule.and_then(|s| s.episode),
            airing_at: schedule.and_then(|s| s.airing_at),
            time_until_airing: schedule.and_then(|s| s.time_until_airing),
        }
    }

    pub fn anime_id(&self) -> u32 {
        self.entry.anime_id
    }

    /// Title to show, preferring a non-blank English title when requested
    pub fn display_title(&self, use_english: bool) -> &str {
        if use_english {
            if let Some(english) = self
                .entry
                .title_english
                .as_deref()
                .filter(|t| !t.trim().is_empty())
            {
                return english;
            }
        }
        &self.entry.title
    }

    /// Countdown until the next episode ("Aired" when unknown or past)
    pub fn countdown(&self) -> String {
        format_time_until(self.time_until_airing.unwrap_or(0))
    }

    /// "Ep 5 (4) - 2d 3h" style line
    pub fn summary_line(&self) -> String {
        let episode = self
            .episode
            .map(|e| e.to_string())
            .unwrap_or_else(|| "-".to_string());
        let watched = self
            .entry
            .watched_episodes
            .map(|w| w.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!("Ep {} ({}) - {}", episode, watched, self.countdown())
    }

    /// MAL detail page for this anime
    pub fn mal_url(&self) -> String {
        format!("{}/{}", MAL_ANIME_URL, self.entry.anime_id)
    }

    /// Airing timestamp in the local timezone
    pub fn airing_at_local(&self) -> Option<DateTime<Local>> {
        self.airing_at
            .and_then(|ts| Local.timestamp_opt(ts, 0).single())
    }
}

/// Format seconds until airing as a compact countdown
pub fn format_time_until(seconds: i64) -> String {
    if seconds <= 0 {
        return "Aired".to_string();
    }

    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
