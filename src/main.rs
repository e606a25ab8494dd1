fn main() -> anyhow::Result<()> {
    use clap::Parser;
    let args = projscrape::cli::Args::parse();
    let env_file = projscrape::config::load_env()?;
    projscrape::cli::init_logging();
    if let Some(path) = env_file {
        tracing::debug!("Loaded environment from {}", path.display());
    }
    projscrape::cli::run(&args)?;
    Ok(())
}
