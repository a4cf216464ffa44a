//! Configuration types and loading
//!
//! Config precedence: CLI args > env vars > config file > defaults.
//! The config file is optional; without one the client talks to the local
//! development backend and keeps tokens in `wealthwiz-tokens.json`.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use wealthwiz_client::ClientConfig;

pub const CONFIG_ENV: &str = "WEALTHWIZ_CONFIG";
pub const TOKEN_FILE_ENV: &str = "WEALTHWIZ_TOKEN_FILE";
const DEFAULT_CONFIG_FILE: &str = "wealthwiz.toml";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ClientConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Where the token pair is persisted
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

fn default_token_file() -> PathBuf {
    PathBuf::from("wealthwiz-tokens.json")
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: &Path) -> common::Result<Self> {
        let mut config: Config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                Config::default()
            }
            Err(e) => return Err(e.into()),
        };

        config.api.apply_env();
        if let Some(path) = std::env::var(TOKEN_FILE_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
        {
            config.storage.token_file = PathBuf::from(path.trim());
        }

        config.api.validate()?;
        Ok(config)
    }

    /// Resolve config file path from CLI arg or WEALTHWIZ_CONFIG env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}
