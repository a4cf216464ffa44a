//! WealthWiz command-line client
//!
//! Signs in against the WealthWiz backend, keeps the token pair in a local
//! file between runs and prints endpoint data as JSON.

mod commands;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wealthwiz_client::{ApiClient, FileTokenStore};

use crate::commands::parse_args;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // JSON logs on stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (cli_config_path, command) = parse_args(&args)?;

    let config_path = Config::resolve_path(cli_config_path.as_deref());
    debug!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        base_url = %config.api.base_url,
        token_file = %config.storage.token_file.display(),
        "configuration loaded"
    );

    let store = FileTokenStore::open(config.storage.token_file.clone())
        .await
        .with_context(|| {
            format!(
                "failed to open token file {}",
                config.storage.token_file.display()
            )
        })?;
    let client = ApiClient::new(config.api, Arc::new(store))?;

    let output = command.run(&client).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
