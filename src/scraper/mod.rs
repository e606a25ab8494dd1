//! Fetching and parsing. Page source trait, shared client, and the ESPN adapter.

mod client;
mod error;

pub mod espn;

pub use client::{PoliteClient, PoliteClientBuilder};
pub use error::ScraperError;

use crate::config::RunContext;
use crate::model::PlayerRecord;

/// Anything that can turn a URL into an HTML body. Implemented by [PoliteClient];
/// tests substitute an in-memory source.
pub trait PageSource {
    /// Fetch one page. Network failures and non-success statuses are errors.
    fn fetch_page(&mut self, url: &str) -> Result<String, ScraperError>;
}

/// Fetch every batter and pitcher projection page for `season` and parse all player tables.
///
/// Records come back in request order. The first transport or parse error aborts the run.
pub fn fetch_projections<S: PageSource + ?Sized>(
    ctx: &RunContext,
    season: i32,
    source: &mut S,
) -> Result<Vec<PlayerRecord>, ScraperError> {
    espn::EspnScraper::new(source).fetch_projections(ctx, season)
}
