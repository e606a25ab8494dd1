//! Shared error type for fetching and parsing projection pages.

use thiserror::Error;

/// Scraper error for HTTP, parsing, and per-player table structure.
#[derive(Debug, Error)]
pub enum ScraperError {
    // HTTP and network
    #[error("Invalid URL: {input}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead { url: String, source: reqwest::Error },

    // Parsing
    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Could not parse player table: missing {what}")]
    MissingElement { what: String },

    #[error("Player {player_id}: expected {expected} stat cells, found {found}")]
    StatCountMismatch {
        player_id: String,
        expected: usize,
        found: usize,
    },

    #[error("Player {player_id}: stat {stat} is not a number: {text:?}")]
    InvalidStat {
        player_id: String,
        stat: &'static str,
        text: String,
    },
}
