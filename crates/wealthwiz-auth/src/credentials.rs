//! Credential storage for the access/refresh token pair
//!
//! `TokenStore` is the seam the request pipeline reads and mutates tokens
//! through. Two implementations ship here:
//!
//! - `MemoryTokenStore` holds the pair for the life of the process only.
//! - `FileTokenStore` mirrors every mutation to a JSON file keyed by
//!   `wealthwiz_access_token` / `wealthwiz_refresh_token`, so a session
//!   survives a restart. Writes use atomic temp-file + rename.
//!
//! Both serialize mutations with a tokio Mutex. A mutation always updates the
//! in-memory pair before persisting, so a failed write never leaves the store
//! holding tokens the caller asked to replace or clear.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use common::Secret;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// The currently held token pair. Either token may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access: Option<Secret<String>>,
    pub refresh: Option<Secret<String>>,
}

impl Credentials {
    pub fn new(access: String, refresh: String) -> Self {
        Self {
            access: Some(Secret::new(access)),
            refresh: Some(Secret::new(refresh)),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access.as_ref().map(|s| s.expose().as_str())
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh.as_ref().map(|s| s.expose().as_str())
    }

    /// True when an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.access.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none()
    }
}

/// Boxed future returned by `TokenStore` methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Owner of the current credentials.
///
/// Uses `Pin<Box<dyn Future>>` return types so clients can hold an
/// `Arc<dyn TokenStore>`.
pub trait TokenStore: Send + Sync {
    /// Snapshot of the held pair.
    fn get(&self) -> StoreFuture<'_, Credentials>;

    /// Replace both tokens (login, registration).
    fn set(&self, access: String, refresh: String) -> StoreFuture<'_, Result<()>>;

    /// Replace the access token only (successful refresh).
    fn set_access(&self, access: String) -> StoreFuture<'_, Result<()>>;

    /// Drop both tokens (logout, failed refresh). The in-memory pair is
    /// cleared even if persisting the cleared state fails.
    fn clear(&self) -> StoreFuture<'_, Result<()>>;
}

/// Process-local store with no persistence.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    state: Mutex<Credentials>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing pair.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            state: Mutex::new(credentials),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> StoreFuture<'_, Credentials> {
        Box::pin(async move { self.state.lock().await.clone() })
    }

    fn set(&self, access: String, refresh: String) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            *self.state.lock().await = Credentials::new(access, refresh);
            Ok(())
        })
    }

    fn set_access(&self, access: String) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            self.state.lock().await.access = Some(Secret::new(access));
            Ok(())
        })
    }

    fn clear(&self) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            *self.state.lock().await = Credentials::default();
            Ok(())
        })
    }
}

/// On-disk shape of the token file. Absent keys mean "unset".
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(
        rename = "wealthwiz_access_token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    access: Option<String>,
    #[serde(
        rename = "wealthwiz_refresh_token",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    refresh: Option<String>,
}

impl From<StoredTokens> for Credentials {
    fn from(stored: StoredTokens) -> Self {
        Self {
            access: stored.access.map(Secret::new),
            refresh: stored.refresh.map(Secret::new),
        }
    }
}

impl From<&Credentials> for StoredTokens {
    fn from(credentials: &Credentials) -> Self {
        Self {
            access: credentials.access_token().map(str::to_owned),
            refresh: credentials.refresh_token().map(str::to_owned),
        }
    }
}

/// Store that mirrors the pair to a JSON file.
///
/// The file is read once in `open`; after that the in-memory pair is the
/// source of truth and every mutation rewrites the file.
pub struct FileTokenStore {
    path: PathBuf,
    state: Mutex<Credentials>,
}

impl FileTokenStore {
    /// Open the token file at `path`.
    ///
    /// A missing file is a valid empty session; it is created on the first
    /// mutation.
    pub async fn open(path: PathBuf) -> Result<Self> {
        let credentials = if path.exists() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Io(format!("reading token file: {e}")))?;
            let stored: StoredTokens = if contents.trim().is_empty() {
                StoredTokens::default()
            } else {
                serde_json::from_str(&contents)
                    .map_err(|e| Error::CredentialParse(format!("parsing token file: {e}")))?
            };
            let credentials = Credentials::from(stored);
            info!(
                path = %path.display(),
                authenticated = credentials.is_authenticated(),
                "loaded stored session"
            );
            credentials
        } else {
            debug!(path = %path.display(), "token file not found, starting signed out");
            Credentials::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(credentials),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> StoreFuture<'_, Credentials> {
        Box::pin(async move { self.state.lock().await.clone() })
    }

    fn set(&self, access: String, refresh: String) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            *state = Credentials::new(access, refresh);
            write_atomic(&self.path, &state).await
        })
    }

    fn set_access(&self, access: String) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            state.access = Some(Secret::new(access));
            write_atomic(&self.path, &state).await
        })
    }

    fn clear(&self) -> StoreFuture<'_, Result<()>> {
        Box::pin(async move {
            let mut state = self.state.lock().await;
            *state = Credentials::default();
            write_atomic(&self.path, &state).await
        })
    }
}

/// Write the pair to `path` atomically with 0600 permissions on unix.
async fn write_atomic(path: &Path, credentials: &Credentials) -> Result<()> {
    let json = serde_json::to_string_pretty(&StoredTokens::from(credentials))
        .map_err(|e| Error::CredentialParse(format!("serializing tokens: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io("token path has no parent directory".into()))?;

    let tmp_path = dir.join(format!(".wealthwiz-tokens.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp token file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting token file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp token file: {e}")))?;

    debug!(path = %path.display(), "persisted tokens");
    Ok(())
}
