//! Shared library for the airing tracker.
//!
//! This crate provides common functionality used by the pipeline and the CLI:
//! - Configuration management
//! - Anime list and airing schedule models
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
