//! MyAnimeList list source.
//!
//! Reads a user's public anime list page and decodes the JSON the site
//! embeds in the list table.

pub mod client;
pub mod parse;

pub use client::MalListClient;
pub use parse::parse_list_page;
