//! MAL list page client.

use super::parse::parse_list_page;
use crate::error::ListFetchError;
use anyhow::{Context, Result};
use reqwest::{Client, Url};
use shared::{AnimeListEntry, WatchStatus};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Reads public MAL anime lists, one page per watch status
#[derive(Debug, Clone)]
pub struct MalListClient {
    /// HTTP client
    client: Client,
    /// Base URL of the MAL site
    base_url: String,
}

impl MalListClient {
    /// Create a new list client with its own HTTP client
    pub fn new(base_url: String, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a list client that shares an existing HTTP client
    pub fn with_client(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of a user's list page, with the username as one escaped path segment
    pub fn list_url(&self, username: &str) -> Result<Url, ListFetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ListFetchError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| ListFetchError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["animelist", username]);

        Ok(url)
    }

    /// Fetch one status page, reporting why a fetch failed
    pub async fn try_fetch_by_status(
        &self,
        username: &str,
        status: WatchStatus,
    ) -> Result<Vec<AnimeListEntry>, ListFetchError> {
        let url = self.list_url(username)?;
        debug!(url = %url, status = %status, "Requesting list page");

        let response = self
            .client
            .get(url)
            .query(&[("status", status.code())])
            .send()
            .await?;

        let code = response.status();
        debug!(status = %status, http_status = %code, "List page response");
        if !code.is_success() {
            return Err(ListFetchError::Status(code));
        }

        let html = response.text().await?;
        debug!(status = %status, html_len = html.len(), "List page received");

        parse_list_page(&html)
    }

    /// Fetch one status page, degrading to an empty list on any failure
    pub async fn fetch_by_status(&self, username: &str, status: WatchStatus) -> Vec<AnimeListEntry> {
        match self.try_fetch_by_status(username, status).await {
            Ok(entries) => {
                info!(status = %status, count = entries.len(), "Fetched list entries");
                entries
            }
            Err(e) => {
                error!(
                    username = username,
                    status = %status,
                    error = %e,
                    "Failed to fetch list, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Fetch watching and plan-to-watch pages concurrently
    ///
    /// Watching entries come first, followed by plan-to-watch entries.
    pub async fn fetch_all(&self, username: &str) -> Vec<AnimeListEntry> {
        let (mut watching, plan_to_watch) = tokio::join!(
            self.fetch_by_status(username, WatchStatus::Watching),
            self.fetch_by_status(username, WatchStatus::PlanToWatch),
        );

        if watching.is_empty() && plan_to_watch.is_empty() {
            warn!(username = username, "No list entries for any status");
        }

        watching.extend(plan_to_watch);
        info!(total = watching.len(), "Fetched combined list");
        watching
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn list_page(rows: &str) -> String {
        format!(
            "<html><body><table class=\"list-table\" data-items='{}'></table></body></html>",
            rows
        )
    }

    fn client(server: &MockServer) -> MalListClient {
        MalListClient::new(server.uri(), Duration::from_secs(5), "test-agent").unwrap()
    }

    async fn mount_status(server: &MockServer, status: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/animelist/someone"))
            .and(query_param("status", status))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    #[test]
    fn test_list_url_escapes_username() {
        let client = MalListClient::new(
            "https://myanimelist.net/".to_string(),
            Duration::from_secs(5),
            "test-agent",
        )
        .unwrap();

        let url = client.list_url("someone").unwrap();
        assert_eq!(url.as_str(), "https://myanimelist.net/animelist/someone");

        let url = client.list_url("a/b?c#d").unwrap();
        assert_eq!(url.path(), "/animelist/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_list_url_keeps_base_path() {
        let client = MalListClient::new(
            "http://localhost:8080/mirror".to_string(),
            Duration::from_secs(5),
            "test-agent",
        )
        .unwrap();

        let url = client.list_url("someone").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/mirror/animelist/someone");
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_absorbed() {
        let client = MalListClient::new(
            "not a url".to_string(),
            Duration::from_secs(5),
            "test-agent",
        )
        .unwrap();

        assert!(matches!(
            client.try_fetch_by_status("someone", WatchStatus::Watching).await,
            Err(ListFetchError::InvalidUrl(_))
        ));
        assert!(client
            .fetch_by_status("someone", WatchStatus::Watching)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_slash_in_username_stays_in_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/animelist/someone"))
            .respond_with(ResponseTemplate::new(200).set_body_string(list_page("[]")))
            .expect(0)
            .mount(&server)
            .await;

        let entries = client(&server)
            .fetch_by_status("someone/../other", WatchStatus::Watching)
            .await;
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_by_status_parses_rows() {
        let server = MockServer::start().await;
        let rows = r#"[{"status":1,"anime_id":1,"anime_title":"One","anime_airing_status":1,"num_watched_episodes":2}]"#;
        mount_status(
            &server,
            "1",
            ResponseTemplate::new(200).set_body_string(list_page(rows)),
        )
        .await;

        let entries = client(&server)
            .fetch_by_status("someone", WatchStatus::Watching)
            .await;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].anime_id, 1);
        assert_eq!(entries[0].title, "One");
    }

    #[tokio::test]
    async fn test_http_error_is_reported_and_absorbed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/animelist/someone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client(&server);
        let checked = client
            .try_fetch_by_status("someone", WatchStatus::Watching)
            .await;
        assert!(matches!(checked, Err(ListFetchError::Status(code)) if code.as_u16() == 404));

        let best_effort = client.fetch_by_status("someone", WatchStatus::Watching).await;
        assert!(best_effort.is_empty());
    }

    #[tokio::test]
    async fn test_page_without_table_is_absorbed() {
        let server = MockServer::start().await;
        mount_status(
            &server,
            "6",
            ResponseTemplate::new(200).set_body_string("<html><body>private list</body></html>"),
        )
        .await;

        let client = client(&server);
        assert!(client
            .fetch_by_status("someone", WatchStatus::PlanToWatch)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_is_absorbed() {
        let client = MalListClient::new(
            "http://127.0.0.1:9".to_string(),
            Duration::from_secs(2),
            "test-agent",
        )
        .unwrap();

        let checked = client
            .try_fetch_by_status("someone", WatchStatus::Watching)
            .await;
        assert!(matches!(checked, Err(ListFetchError::Http(_))));
        assert!(client.fetch_all("someone").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_concatenates_watching_then_plan_to_watch() {
        let server = MockServer::start().await;
        mount_status(
            &server,
            "1",
            ResponseTemplate::new(200).set_body_string(list_page(
                r#"[{"status":1,"anime_id":10,"anime_title":"Watching","anime_airing_status":1}]"#,
            )),
        )
        .await;
        mount_status(
            &server,
            "6",
            ResponseTemplate::new(200).set_body_string(list_page(
                r#"[{"status":6,"anime_id":20,"anime_title":"Later","anime_airing_status":3}]"#,
            )),
        )
        .await;

        let entries = client(&server).fetch_all("someone").await;
        let ids: Vec<u32> = entries.iter().map(|e| e.anime_id).collect();
        assert_eq!(ids, vec![10, 20]);
        assert_eq!(entries[1].watch_status, WatchStatus::PlanToWatch);
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_surviving_status() {
        let server = MockServer::start().await;
        mount_status(&server, "1", ResponseTemplate::new(500)).await;
        mount_status(
            &server,
            "6",
            ResponseTemplate::new(200).set_body_string(list_page(
                r#"[{"status":6,"anime_id":20,"anime_title":"Later","anime_airing_status":3}]"#,
            )),
        )
        .await;

        let entries = client(&server).fetch_all("someone").await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].anime_id, 20);
    }
}
