//! Authenticated request pipeline
//!
//! `ApiClient::request` performs one logical API call:
//!
//! 1. Read the held credentials and build headers (JSON content type, caller
//!    headers, bearer token).
//! 2. Send. A 2xx body is decoded and returned.
//! 3. On 401 with a refresh token held, refresh once and resend with the new
//!    access token. The retry's outcome is final: a second 401 is reported as
//!    an API error and never triggers another refresh.
//! 4. If the refresh fails, both tokens are cleared before `SessionExpired`
//!    is returned.
//!
//! Refreshes are single-flight. Concurrent requests that all see a 401 queue
//! on `refresh_guard`; whoever gets it second finds the token already rotated
//! and retries without a refresh call of its own.

use std::sync::Arc;

use common::Secret;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use wealthwiz_auth::{REFRESH_PATH, TokenStore, refresh_access_token};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::headers::{HeaderInput, build_headers};

/// Method, headers and body for one call. Everything is optional: the
/// default is a GET with no extra headers and no body.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderInput,
    pub body: Option<serde_json::Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn headers(mut self, headers: impl Into<HeaderInput>) -> Self {
        self.headers = headers.into();
        self
    }

    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("serializing request body: {e}")))?;
        Ok(self.body(value))
    }
}

/// WealthWiz API client.
///
/// Holds the token store it authenticates with; two clients with separate
/// stores are independent sessions. Share one client behind an `Arc` so that
/// concurrent requests share the refresh guard.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn TokenStore>,
    refresh_guard: Mutex<()>,
}

impl ApiClient {
    /// Build a client with its own connection pool.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| common::Error::Config(format!("building HTTP client: {e}")))?;
        Ok(Self::with_http_client(config, store, http))
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            config,
            store,
            refresh_guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    /// The held access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.store.get().await.access_token().map(str::to_owned)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.store.get().await.is_authenticated()
    }

    /// Install a token pair, as login and registration do.
    pub async fn set_tokens(&self, access: String, refresh: String) -> Result<()> {
        self.store.set(access, refresh).await?;
        Ok(())
    }

    /// Drop the held token pair.
    pub async fn clear_tokens(&self) -> Result<()> {
        self.store.clear().await?;
        Ok(())
    }

    /// Perform one authenticated call and decode the JSON response.
    ///
    /// An empty success body decodes as JSON `null`.
    #[instrument(
        skip_all,
        fields(request_id = %new_request_id(), method = %options.method, path = %path)
    )]
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let url = self.config.url(path);
        let credentials = self.store.get().await;

        let response = self
            .send(&url, &options, credentials.access_token())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED && credentials.refresh.is_some() {
            debug!("access token rejected, refreshing");
            if !self.recover_session(credentials.access.as_ref()).await {
                return Err(ApiError::SessionExpired);
            }

            let renewed = self.store.get().await;
            let retry = self.send(&url, &options, renewed.access_token()).await?;
            return finish(retry).await;
        }

        finish(response).await
    }

    /// `request` decoding into an untyped JSON value.
    pub async fn request_json(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        self.request(path, options).await
    }

    /// Exchange the held refresh token for a new access token.
    ///
    /// Returns `true` once the new token is installed. Every failure (no
    /// refresh token, network error, rejected or malformed response) returns
    /// `false` and leaves the store untouched.
    pub async fn refresh(&self) -> bool {
        let credentials = self.store.get().await;
        let Some(refresh) = credentials.refresh_token() else {
            debug!("no refresh token held");
            return false;
        };

        let url = self.config.url(REFRESH_PATH);
        match refresh_access_token(&self.http, &url, refresh).await {
            Ok(response) => {
                let persisted = match response.refresh {
                    Some(rotated) => self.store.set(response.access, rotated).await,
                    None => self.store.set_access(response.access).await,
                };
                if let Err(e) = persisted {
                    warn!(error = %e, "refreshed token could not be persisted");
                }
                crate::metrics::record_refresh(true);
                info!("access token refreshed");
                true
            }
            Err(e) => {
                crate::metrics::record_refresh(false);
                warn!(error = %e, "token refresh failed");
                false
            }
        }
    }

    /// Single-flight refresh after a 401.
    ///
    /// `rejected` is the access token the failed request carried. If the
    /// store already holds a different one, a concurrent request refreshed
    /// while this one waited and no further refresh is needed. On failure the
    /// store is cleared before the guard is released.
    async fn recover_session(&self, rejected: Option<&Secret<String>>) -> bool {
        let _guard = self.refresh_guard.lock().await;

        let current = self.store.get().await;
        if current.access.is_some() && current.access.as_ref() != rejected {
            debug!("access token already renewed by a concurrent request");
            return true;
        }

        if self.refresh().await {
            return true;
        }

        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "cleared session could not be persisted");
        }
        info!("session expired, credentials cleared");
        false
    }

    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        access_token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let headers = build_headers(&options.headers, access_token);
        let mut builder = self
            .http
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|e| {
            crate::metrics::record_network_error(options.method.as_str());
            warn!(error = %e, "request failed before a response arrived");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        crate::metrics::record_request(options.method.as_str(), status);
        debug!(status, authenticated = access_token.is_some(), "response received");
        Ok(response)
    }
}

fn new_request_id() -> String {
    format!("req_{}", uuid::Uuid::new_v4().as_simple())
}

/// Turn a final response into the caller's result.
async fn finish<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.bytes().await.unwrap_or_default();
        return Err(ApiError::from_error_body(status.as_u16(), &body));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(format!("reading response body: {e}")))?;
    decode(&body)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}
