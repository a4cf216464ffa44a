//! Errors surfaced by the request pipeline

/// Message returned when a refresh attempt fails and the session is dropped.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// Errors from API calls.
///
/// `Display` is the human-readable message a caller shows to the user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The call never reached or never returned from the server.
    #[error("network error: {0}")]
    Network(String),

    /// The access token was rejected and refreshing it failed. Both tokens
    /// have been cleared.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    /// Non-2xx response. `message` is the server's `detail`/`message` field
    /// or `API Error: <status>`.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request could not be built (e.g. unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("credential storage error: {0}")]
    Storage(#[from] wealthwiz_auth::Error),

    #[error(transparent)]
    Config(#[from] common::Error),
}

/// Result alias for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build an `Api` error from a non-2xx response body.
    ///
    /// Tolerates empty and non-JSON bodies. Prefers `detail`, then
    /// `message`, then falls back to `API Error: <status>`.
    pub fn from_error_body(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|value| server_message(&value))
            .unwrap_or_else(|| format!("API Error: {status}"));
        ApiError::Api { status, message }
    }
}

fn server_message(value: &serde_json::Value) -> Option<String> {
    ["detail", "message"].iter().find_map(|key| match value.get(key) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}
