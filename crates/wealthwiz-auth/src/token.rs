//! Token endpoint wire types and the refresh call
//!
//! Login and registration go through the client's request pipeline like any
//! other call; only their payload types live here. Refresh is different: it
//! must bypass the pipeline (a 401 from the refresh endpoint must not trigger
//! another refresh), so the raw call is implemented here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Access/refresh pair returned by login and embedded in registration.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Response from the refresh endpoint.
///
/// `refresh` is only present when the server rotates refresh tokens.
#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl fmt::Debug for RefreshResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshResponse")
            .field("access", &"[REDACTED]")
            .field("rotated", &self.refresh.is_some())
            .finish()
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Credentials for the token issuance endpoint. The backend identifies
/// users by username, which is the email address.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "username")]
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Payload for the registration endpoint.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl RegisterRequest {
    /// Build a request whose confirmation matches the password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let password = password.into();
        Self {
            email: email.into(),
            password_confirm: password.clone(),
            password,
            full_name: None,
        }
    }

    pub fn full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("full_name", &self.full_name)
            .finish()
    }
}

/// User record returned by registration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthUser {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Registration response: the new user plus an issued token pair.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthResponse {
    pub user: AuthUser,
    pub tokens: TokenPair,
}

/// Exchange a refresh token for a new access token.
///
/// `url` is the absolute refresh endpoint. 401/403 map to
/// `InvalidCredentials` (the refresh token is expired or revoked); every
/// other non-success maps to `TokenRefresh`.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    url: &str,
    refresh: &str,
) -> Result<RefreshResponse> {
    let response = client
        .post(url)
        .json(&RefreshRequest { refresh })
        .send()
        .await
        .map_err(|e| Error::Http(format!("token refresh request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::InvalidCredentials(format!(
                "refresh token rejected ({status}): {body}"
            )));
        }

        return Err(Error::TokenRefresh(format!(
            "refresh endpoint returned {status}: {body}"
        )));
    }

    response
        .json::<RefreshResponse>()
        .await
        .map_err(|e| Error::TokenRefresh(format!("invalid refresh response: {e}")))
}
