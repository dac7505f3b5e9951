//! Plain-text rendering of a pipeline result.

use crate::error::PipelineError;
use anyhow::{Context, Result};
use serde::Serialize;
use shared::CombinedAnimeRecord;

/// Format for the local airing time in text output
const AIRING_TIME_FORMAT: &str = "%a %d %b %H:%M";

/// Shown when no username has been configured
pub const SETUP_REQUIRED: &str = "Setup Required\nSet user.username in the config file or pass --username";

/// Shown when the pipeline produced no records
pub const NO_AIRING: &str = "No airing anime";

/// A record plus the derived fields a host needs to link and schedule it
#[derive(Debug, Serialize)]
pub struct RecordView<'a> {
    #[serde(flatten)]
    pub record: &'a CombinedAnimeRecord,
    pub mal_url: String,
    /// RFC 3339 in the local timezone
    pub airing_at_local: Option<String>,
}

impl<'a> From<&'a CombinedAnimeRecord> for RecordView<'a> {
    fn from(record: &'a CombinedAnimeRecord) -> Self {
        Self {
            record,
            mal_url: record.mal_url(),
            airing_at_local: record.airing_at_local().map(|at| at.to_rfc3339()),
        }
    }
}

/// "<local airing time> | <MAL link>", or just the link when unscheduled
fn link_line(record: &CombinedAnimeRecord) -> String {
    match record.airing_at_local() {
        Some(at) => format!("{} | {}", at.format(AIRING_TIME_FORMAT), record.mal_url()),
        None => record.mal_url(),
    }
}

/// Render records as title, summary and link lines
pub fn render_records(records: &[CombinedAnimeRecord], use_english_title: bool) -> String {
    if records.is_empty() {
        return NO_AIRING.to_string();
    }

    records
        .iter()
        .map(|record| {
            format!(
                "{}\n  {}\n  {}",
                record.display_title(use_english_title),
                record.summary_line(),
                link_line(record)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a full pipeline outcome
pub fn render_outcome(
    outcome: &Result<Vec<CombinedAnimeRecord>, PipelineError>,
    use_english_title: bool,
) -> String {
    match outcome {
        Ok(records) => render_records(records, use_english_title),
        Err(PipelineError::InvalidUsername) => SETUP_REQUIRED.to_string(),
        Err(e) => format!("Error\n{}", e.message()),
    }
}

/// Records as pretty-printed JSON, each with its MAL link and local airing time
pub fn render_json(records: &[CombinedAnimeRecord]) -> Result<String> {
    let views: Vec<RecordView<'_>> = records.iter().map(RecordView::from).collect();
    serde_json::to_string_pretty(&views).context("Failed to serialize records")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AiringScheduleEntry, AiringStatus, AnimeListEntry, WatchStatus};

    fn record() -> CombinedAnimeRecord {
        let entry = AnimeListEntry {
            anime_id: 52991,
            title: "Sousou no Frieren".to_string(),
            title_english: Some("Frieren".to_string()),
            airing_status: AiringStatus::Airing,
            watch_status: WatchStatus::Watching,
            watched_episodes: Some(5),
        };
        let schedule = AiringScheduleEntry {
            episode: Some(6),
            airing_at: Some(1_700_000_000),
            time_until_airing: Some(2 * 3_600 + 30 * 60),
        };
        CombinedAnimeRecord::new(entry, Some(&schedule))
    }

    #[test]
    fn test_render_records() {
        let record = record();
        let local = record
            .airing_at_local()
            .unwrap()
            .format(AIRING_TIME_FORMAT)
            .to_string();

        let text = render_records(&[record.clone()], true);
        assert_eq!(
            text,
            format!(
                "Frieren\n  Ep 6 (5) - 2h 30m\n  {} | https://myanimelist.net/anime/52991",
                local
            )
        );

        let text = render_records(&[record], false);
        assert!(text.starts_with("Sousou no Frieren\n"));
    }

    #[test]
    fn test_unscheduled_record_shows_link_only() {
        let mut record = record();
        record.airing_at = None;
        record.time_until_airing = None;

        let text = render_records(&[record], true);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "  https://myanimelist.net/anime/52991");
    }

    #[test]
    fn test_render_outcomes() {
        assert_eq!(render_outcome(&Ok(Vec::new()), true), NO_AIRING);
        assert_eq!(
            render_outcome(&Err(PipelineError::InvalidUsername), true),
            SETUP_REQUIRED
        );
        assert_eq!(
            render_outcome(&Err(PipelineError::Internal("boom".to_string())), true),
            "Error\nunexpected pipeline failure: boom"
        );
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&[record()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["entry"]["anime_id"], 52991);
        assert_eq!(value[0]["episode"], 6);
        assert_eq!(value[0]["mal_url"], "https://myanimelist.net/anime/52991");

        let local = value[0]["airing_at_local"].as_str().unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(local).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_render_json_unscheduled_has_null_time() {
        let mut record = record();
        record.airing_at = None;

        let json = render_json(&[record]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value[0]["airing_at_local"].is_null());
        assert_eq!(value[0]["mal_url"], "https://myanimelist.net/anime/52991");
    }
}
