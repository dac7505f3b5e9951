//! Joining list entries with airing schedules.
//!
//! Pure and deterministic: the same entries and schedules always produce the
//! same ordered records.

use crate::anilist::ScheduleMap;
use shared::{AiringStatus, AnimeListEntry, CombinedAnimeRecord};
use tracing::debug;

/// Join list entries with their schedules and order them by airing time
///
/// - Finished (or unrecognised) entries are dropped.
/// - Airing entries without a schedule are dropped: the list is taken to be
///   stale and the show to have ended.
/// - Not-yet-aired entries are kept with or without a schedule.
/// - Records sort ascending by `airing_at`; unscheduled records go last.
///   The sort is stable, so ties keep their input order.
pub fn merge(entries: &[AnimeListEntry], schedules: &ScheduleMap) -> Vec<CombinedAnimeRecord> {
    let mut records: Vec<CombinedAnimeRecord> = entries
        .iter()
        .filter(|entry| entry.airing_status.is_upcoming())
        .filter_map(|entry| {
            let schedule = schedules.get(&entry.anime_id).and_then(Option::as_ref);

            if entry.airing_status == AiringStatus::Airing && schedule.is_none() {
                debug!(
                    mal_id = entry.anime_id,
                    title = %entry.title,
                    "Airing entry has no upcoming episode, dropping"
                );
                return None;
            }

            Some(CombinedAnimeRecord::new(entry.clone(), schedule))
        })
        .collect();

    records.sort_by_key(|record| record.airing_at.unwrap_or(i64::MAX));
    records
}

/// Distinct ids of entries that can have an upcoming episode, in list order
pub fn schedulable_ids(entries: &[AnimeListEntry]) -> Vec<u32> {
    let mut seen = std::collections::HashSet::new();
    entries
        .iter()
        .filter(|entry| entry.airing_status.is_upcoming())
        .map(|entry| entry.anime_id)
        .filter(|id| seen.insert(*id))
        .collect()
}
