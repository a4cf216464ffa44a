//! WealthWiz credential handling
//!
//! Owns the access/refresh token pair, the storage seam it lives behind and
//! the raw token-refresh call. The request pipeline in `wealthwiz-client`
//! builds on these pieces; nothing here knows about the rest of the API.
//!
//! Credential lifecycle:
//! 1. Login or registration returns a `TokenPair`, stored via `TokenStore::set()`
//! 2. Each request reads the pair via `TokenStore::get()`
//! 3. A 401 triggers `token::refresh_access_token()`; the new access token is
//!    installed via `TokenStore::set_access()`
//! 4. A failed refresh or a logout calls `TokenStore::clear()`

pub mod constants;
pub mod credentials;
pub mod error;
pub mod token;

pub use constants::*;
pub use credentials::{Credentials, FileTokenStore, MemoryTokenStore, StoreFuture, TokenStore};
pub use error::{Error, Result};
pub use token::{
    AuthResponse, AuthUser, LoginRequest, RefreshResponse, RegisterRequest, TokenPair,
    refresh_access_token,
};
