//! Client configuration
//!
//! The base URL defaults to the local development backend and can be
//! redirected with `WEALTHWIZ_API_URL` (or `NEXT_PUBLIC_API_URL`, which the
//! web build reads). The same struct is the `[api]` table of the CLI's TOML
//! file.

use std::time::Duration;

use serde::Deserialize;
use wealthwiz_auth::{API_URL_ENV, DEFAULT_API_BASE_URL, LEGACY_API_URL_ENV};

/// Connection settings for `ApiClient`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. A timed-out call is reported as a network error.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with environment overrides, validated.
    pub fn from_env() -> common::Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Overlay the base URL from the environment.
    ///
    /// `WEALTHWIZ_API_URL` takes precedence over `NEXT_PUBLIC_API_URL`.
    /// Empty values are ignored.
    pub fn apply_env(&mut self) {
        let from_env = [API_URL_ENV, LEGACY_API_URL_ENV]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty());
        if let Some(url) = from_env {
            self.base_url = url.trim().to_string();
        }
    }

    pub fn validate(&self) -> common::Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for an API path such as `/readiness/`.
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
