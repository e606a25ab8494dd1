//! projscrape: CLI scraper for ESPN fantasy baseball season projections, outputting CSV.

pub mod cli;
pub mod config;
pub mod export;
pub mod model;
pub mod scraper;

// Re-exports for CLI and consumers.
pub use config::{load_config, load_env, Config, ConfigError, RunContext};
pub use export::{export, write_csv, ExportError, ExportSummary};
pub use model::{PlayerRecord, Position, PositionEligibility, PositionGroup, StatField};
pub use scraper::{
    fetch_projections, PageSource, PoliteClient, PoliteClientBuilder, ScraperError,
};
