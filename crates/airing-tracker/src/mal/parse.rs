//! Extraction of list rows from a MAL list page.

use crate::error::ListFetchError;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use shared::AnimeListEntry;

/// The list table carries its rows as JSON in this attribute
const DATA_ITEMS_ATTR: &str = "data-items";

static LIST_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.list-table").expect("list table selector"));

/// Decode the list rows embedded in a list page's HTML
///
/// Only the first `table.list-table` is read. A table without rows still
/// carries `data-items="[]"`, so an empty vector here is a confirmed empty
/// list rather than a parse failure.
pub fn parse_list_page(html: &str) -> Result<Vec<AnimeListEntry>, ListFetchError> {
    let document = Html::parse_document(html);

    let table = document
        .select(&LIST_TABLE)
        .next()
        .ok_or(ListFetchError::MissingTable)?;

    let items = table
        .value()
        .attr(DATA_ITEMS_ATTR)
        .map(str::trim)
        .filter(|items| !items.is_empty())
        .ok_or(ListFetchError::EmptyDataItems)?;

    let entries: Vec<AnimeListEntry> = serde_json::from_str(items)?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AiringStatus, WatchStatus};

    fn page(table: &str) -> String {
        format!(
            "<html><head><title>list</title></head><body><div id=\"list\">{}</div></body></html>",
            table
        )
    }

    #[test]
    fn test_parse_entries_from_table() {
        // html5ever decodes the &quot; entities before the JSON parser sees them
        let html = page(
            r#"<table class="list-table" data-items="[{&quot;status&quot;:1,&quot;anime_id&quot;:52991,&quot;anime_title&quot;:&quot;Sousou no Frieren&quot;,&quot;anime_title_eng&quot;:&quot;Frieren&quot;,&quot;anime_airing_status&quot;:1,&quot;num_watched_episodes&quot;:3},{&quot;status&quot;:1,&quot;anime_id&quot;:5114,&quot;anime_title&quot;:&quot;Fullmetal Alchemist: Brotherhood&quot;,&quot;anime_title_eng&quot;:&quot;&quot;,&quot;anime_airing_status&quot;:2,&quot;num_watched_episodes&quot;:64}]"></table>"#,
        );

        let entries = parse_list_page(&html).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].anime_id, 52991);
        assert_eq!(entries[0].airing_status, AiringStatus::Airing);
        assert_eq!(entries[0].watch_status, WatchStatus::Watching);
        assert_eq!(entries[1].title, "Fullmetal Alchemist: Brotherhood");
        assert_eq!(entries[1].airing_status, AiringStatus::Finished);
    }

    #[test]
    fn test_empty_array_is_confirmed_empty() {
        let html = page(r#"<table class="list-table" data-items="[]"></table>"#);
        assert!(parse_list_page(&html).unwrap().is_empty());
    }

    #[test]
    fn test_missing_table() {
        let html = page(r#"<table class="other" data-items="[]"></table>"#);
        assert!(matches!(
            parse_list_page(&html),
            Err(ListFetchError::MissingTable)
        ));
    }

    #[test]
    fn test_missing_or_blank_attribute() {
        let html = page(r#"<table class="list-table"></table>"#);
        assert!(matches!(
            parse_list_page(&html),
            Err(ListFetchError::EmptyDataItems)
        ));

        let html = page(r#"<table class="list-table" data-items="  "></table>"#);
        assert!(matches!(
            parse_list_page(&html),
            Err(ListFetchError::EmptyDataItems)
        ));
    }

    #[test]
    fn test_malformed_json() {
        let html = page(r#"<table class="list-table" data-items="[{not json"></table>"#);
        assert!(matches!(parse_list_page(&html), Err(ListFetchError::Json(_))));
    }
}
