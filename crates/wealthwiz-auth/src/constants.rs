//! WealthWiz API constants
//!
//! Storage keys match the ones the browser build wrote to local storage, so a
//! token file can be inspected or seeded by hand.

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "wealthwiz_access_token";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "wealthwiz_refresh_token";

/// Base URL used when nothing overrides it
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable that redirects all calls to another origin
pub const API_URL_ENV: &str = "WEALTHWIZ_API_URL";

/// Fallback override read by the web build
pub const LEGACY_API_URL_ENV: &str = "NEXT_PUBLIC_API_URL";

/// Registration endpoint (no auth)
pub const REGISTER_PATH: &str = "/auth/register/";

/// Token issuance endpoint (no auth)
pub const LOGIN_PATH: &str = "/auth/login/";

/// Token refresh endpoint. Carries the refresh token in the body, never a
/// bearer header.
pub const REFRESH_PATH: &str = "/auth/refresh/";

/// Current-user endpoint (auth required)
pub const ME_PATH: &str = "/auth/me/";
