//! CLI parsing and orchestration. Parses args, runs fetch -> CSV export, sets up logging.

use crate::config::{self, ConfigError, RunContext};
use crate::export::{export, ExportError};
use crate::scraper::{fetch_projections, PoliteClient, ScraperError};
use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Top-level run error. Every variant is fatal.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Parser, Debug)]
#[command(name = "projscrape")]
#[command(about = "Fetch ESPN fantasy baseball season projections and write them as CSV")]
#[command(
    after_help = "Config file keys (output_dir, user_agent, request_delay_secs) are read from ./projscrape.toml or the user config dir. A .env file in the working directory or any parent is loaded first; RUST_LOG sets the log level."
)]
pub struct Args {
    /// Season year, used for logging and the output file name.
    pub year: i32,

    /// Fetch ESPN projections (default).
    #[arg(long, overrides_with = "no_espn")]
    pub espn: bool,

    /// Skip the ESPN fetch.
    #[arg(long, overrides_with = "espn")]
    pub no_espn: bool,
}

impl Args {
    pub fn espn_enabled(&self) -> bool {
        !self.no_espn
    }
}

/// Install the stderr log subscriber. Level comes from RUST_LOG, default info.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: &config::Config) -> Result<PoliteClient, CliRunError> {
    let mut builder = PoliteClient::builder();
    if let Some(secs) = config.request_delay_secs {
        builder = builder.delay_secs(secs);
    }
    if let Some(ref ua) = config.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    builder.build().map_err(CliRunError::Client)
}

/// Entry point for the CLI. Returns Ok(()) on success; the first error aborts the run.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    info!("Fetching projections for {} season.", args.year);

    let config = config::load_config()?.unwrap_or_default();

    let players = if args.espn_enabled() {
        let ctx = RunContext::new(args.year, config.output_dir());
        let mut client = build_client(&config)?;
        let players = fetch_projections(&ctx, args.year, &mut client)?;
        export(&ctx, &players, args.year)?;
        players
    } else {
        Vec::new()
    };

    info!("Fetched projections for {} players", players.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_is_required() {
        assert!(Args::try_parse_from(["projscrape"]).is_err());
    }

    #[test]
    fn year_must_be_integer() {
        assert!(Args::try_parse_from(["projscrape", "twenty"]).is_err());
        assert!(Args::try_parse_from(["projscrape", "2018.5"]).is_err());
    }

    #[test]
    fn espn_enabled_by_default() -> Result<(), clap::Error> {
        let args = Args::try_parse_from(["projscrape", "2018"])?;
        assert_eq!(args.year, 2018);
        assert!(args.espn_enabled());
        Ok(())
    }

    #[test]
    fn no_espn_disables_fetch() -> Result<(), clap::Error> {
        let args = Args::try_parse_from(["projscrape", "2018", "--no-espn"])?;
        assert!(!args.espn_enabled());
        Ok(())
    }

    #[test]
    fn last_espn_toggle_wins() -> Result<(), clap::Error> {
        let args = Args::try_parse_from(["projscrape", "--no-espn", "--espn", "2018"])?;
        assert!(args.espn_enabled());
        let args = Args::try_parse_from(["projscrape", "--espn", "--no-espn", "2018"])?;
        assert!(!args.espn_enabled());
        Ok(())
    }

    #[test]
    fn unknown_flags_rejected() {
        assert!(Args::try_parse_from(["projscrape", "2018", "--output", "x"]).is_err());
    }

    #[test]
    fn run_with_no_espn_skips_network() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::try_parse_from(["projscrape", "2018", "--no-espn"])?;
        run(&args)?;
        Ok(())
    }

    #[test]
    fn transparent_errors_keep_inner_message() {
        let e = CliRunError::from(ScraperError::HttpStatus {
            status: 404,
            url: "http://example.com".into(),
        });
        assert_eq!(e.to_string(), "HTTP 404 when fetching: http://example.com");
    }
}
