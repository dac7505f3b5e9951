//! Error types for the list and schedule sources and the pipeline boundary.
//!
//! The sources return these from their checked operations so callers can
//! tell a confirmed empty result from a failed fetch. The best-effort
//! operations log them and degrade to empty results instead.

use reqwest::StatusCode;

/// Failure while reading a user's list page
#[derive(Debug, thiserror::Error)]
pub enum ListFetchError {
    #[error("invalid list URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("list page returned HTTP {0}")]
    Status(StatusCode),

    #[error("list table not found in page")]
    MissingTable,

    #[error("data-items attribute is missing or empty")]
    EmptyDataItems,

    #[error("failed to decode list JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a whole schedule batch request
#[derive(Debug, thiserror::Error)]
pub enum ScheduleFetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("schedule endpoint returned HTTP {0}")]
    Status(StatusCode),

    #[error("response has no data object")]
    MissingData,

    #[error("failed to decode schedule response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure surfaced to whoever displays the pipeline result
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("no MAL username configured")]
    InvalidUsername,

    #[error("failed to set up HTTP client: {0}")]
    Client(String),

    #[error("unexpected pipeline failure: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Human-readable message for display
    pub fn message(&self) -> String {
        self.to_string()
    }
}
