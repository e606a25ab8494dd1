//! Optional config file loading, `.env` loading, and the per-run context.
//!
//! Config search order: ./projscrape.toml, then $XDG_CONFIG_HOME/projscrape/config.toml
//! (or ~/.config/projscrape/config.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output directory when the config does not set one. Relative to CWD.
pub const DEFAULT_OUTPUT_DIR: &str = "data/raw";

/// Errors from reading the config file or the `.env` file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Cannot load .env file: {0}")]
    Env(#[from] dotenvy::Error),
}

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Directory the CSV is written to. Default `data/raw`.
    pub output_dir: Option<PathBuf>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Delay in seconds between page requests.
    pub request_delay_secs: Option<u64>,
}

impl Config {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }
}

/// Search order: (1) ./projscrape.toml, (2) $XDG_CONFIG_HOME/projscrape/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    let mut paths = vec![cwd.join("projscrape.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("projscrape").join("config.toml"));
    }
    load_config_from(&paths)
}

/// Load the first existing file of `paths`.
pub fn load_config_from(paths: &[PathBuf]) -> Result<Option<Config>, ConfigError> {
    for path in paths {
        if path.exists() {
            return read_config(path).map(Some);
        }
    }
    Ok(None)
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&s).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load `.env` from the working directory or the nearest ancestor into the process
/// environment. Returns the loaded path; a missing file is not an error.
pub fn load_env() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// State handed to the fetcher and the exporter for one run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory the CSV is written to.
    pub output_dir: PathBuf,
    /// Span every stage logs under; carries the season.
    pub span: tracing::Span,
}

impl RunContext {
    pub fn new(season: i32, output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            span: tracing::info_span!("projections", season),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let c: Config = toml::from_str("").unwrap();
        assert!(c.output_dir.is_none());
        assert!(c.user_agent.is_none());
        assert!(c.request_delay_secs.is_none());
        assert_eq!(c.output_dir(), PathBuf::from("data/raw"));
    }

    #[test]
    fn parse_full_config() {
        let s = r#"
            output_dir = "out"
            user_agent = "Custom/1.0"
            request_delay_secs = 3
        "#;
        let c: Config = toml::from_str(s).unwrap();
        assert_eq!(c.output_dir.as_deref(), Some(Path::new("out")));
        assert_eq!(c.output_dir(), PathBuf::from("out"));
        assert_eq!(c.user_agent.as_deref(), Some("Custom/1.0"));
        assert_eq!(c.request_delay_secs, Some(3));
    }

    #[test]
    fn invalid_toml_errors() {
        assert!(toml::from_str::<Config>("output_dir = [").is_err());
    }

    #[test]
    fn load_config_from_missing_paths_is_none() -> Result<(), ConfigError> {
        let paths = vec![std::env::temp_dir().join("projscrape_no_such_config.toml")];
        assert!(load_config_from(&paths)?.is_none());
        Ok(())
    }

    #[test]
    fn load_config_from_first_existing_path() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join("projscrape_test_config.toml");
        std::fs::write(&path, "request_delay_secs = 0\n")?;
        let paths = vec![
            std::env::temp_dir().join("projscrape_no_such_config.toml"),
            path.clone(),
        ];
        let loaded = load_config_from(&paths);
        std::fs::remove_file(&path).ok();
        let config = loaded?.ok_or("config not found")?;
        assert_eq!(config.request_delay_secs, Some(0));
        Ok(())
    }

    #[test]
    fn load_config_from_invalid_file_errors() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join("projscrape_test_bad_config.toml");
        std::fs::write(&path, "output_dir = [")?;
        let loaded = load_config_from(std::slice::from_ref(&path));
        std::fs::remove_file(&path).ok();
        assert!(matches!(loaded, Err(ConfigError::Parse { .. })));
        Ok(())
    }
}
