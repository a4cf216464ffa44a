//! WealthWiz API client
//!
//! Authenticated access to the WealthWiz backend. Every call goes through one
//! request pipeline (`ApiClient::request`) that merges headers, attaches the
//! held bearer token and, on a 401, refreshes the access token once before
//! retrying. Typed wrappers for each endpoint and the dashboard aggregation
//! sit on top of the pipeline.
//!
//! ```no_run
//! # async fn demo() -> wealthwiz_client::Result<()> {
//! use std::sync::Arc;
//! use wealthwiz_client::{ApiClient, ClientConfig, LoginRequest, MemoryTokenStore};
//!
//! let client = ApiClient::new(ClientConfig::from_env()?, Arc::new(MemoryTokenStore::new()))?;
//! client.login(&LoginRequest::new("asha@example.com", "s3cret")).await?;
//! let readiness = client.readiness().await?;
//! println!("score {}", readiness.score);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod endpoints;
pub mod error;
pub mod headers;
pub mod metrics;
pub mod types;

pub use client::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use dashboard::DashboardData;
pub use error::{ApiError, Result};
pub use headers::HeaderInput;
pub use wealthwiz_auth::{
    AuthResponse, Credentials, FileTokenStore, LoginRequest, MemoryTokenStore, RegisterRequest,
    TokenPair, TokenStore,
};
