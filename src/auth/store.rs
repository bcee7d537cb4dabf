//! Shared token storage.
//!
//! One `TokenStore` instance backs every clone of the API client. Tokens
//! live behind an async `RwLock` and are mirrored to a `session.json`
//! snapshot so a restart can resume the session. The pair is written and
//! cleared together; a snapshot holding only one token reads as signed out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::models::{TokenPair, User};

/// Session file name in the session directory
const SESSION_FILE: &str = "session.json";

/// On-disk and in-memory shape of the session snapshot. The `user` entry
/// is an opaque JSON copy of the last `/auth/me` answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<serde_json::Value>,
}

pub struct TokenStore {
    inner: RwLock<StoredSession>,
    path: Option<PathBuf>,
}

impl TokenStore {
    /// Open the store backed by `<dir>/session.json`, loading whatever
    /// snapshot is already there. A corrupt snapshot is discarded.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        let path = dir.as_ref().join(SESSION_FILE);
        let session = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(session) => session,
                Err(error) => {
                    warn!(%error, path = %path.display(), "discarding corrupt session snapshot");
                    StoredSession::default()
                }
            },
            Err(_) => StoredSession::default(),
        };
        Self {
            inner: RwLock::new(session),
            path: Some(path),
        }
    }

    /// Store without disk persistence.
    pub fn in_memory() -> Self {
        Self {
            inner: RwLock::new(StoredSession::default()),
            path: None,
        }
    }

    /// Current token pair. `None` unless both tokens are present.
    pub async fn read(&self) -> Option<TokenPair> {
        let session = self.inner.read().await;
        match (&session.access_token, &session.refresh_token) {
            (Some(access), Some(refresh)) => Some(TokenPair::new(access.clone(), refresh.clone())),
            _ => None,
        }
    }

    /// Replace both tokens in one step.
    pub async fn write(&self, pair: &TokenPair) {
        let mut session = self.inner.write().await;
        session.access_token = Some(pair.access_token.clone());
        session.refresh_token = Some(pair.refresh_token.clone());
        self.persist(&session);
    }

    /// Drop tokens and the cached user together.
    pub async fn clear(&self) {
        let mut session = self.inner.write().await;
        *session = StoredSession::default();
        if let Some(path) = &self.path {
            if path.exists() {
                if let Err(error) = std::fs::remove_file(path) {
                    warn!(%error, "failed to remove session snapshot");
                }
            }
        }
    }

    /// Cache the signed-in user's profile alongside the tokens.
    pub async fn store_user(&self, user: &User) {
        match serde_json::to_value(user) {
            Ok(value) => {
                let mut session = self.inner.write().await;
                session.user = Some(value);
                self.persist(&session);
            }
            Err(error) => warn!(%error, "failed to serialize user snapshot"),
        }
    }

    /// Last cached user, if the snapshot holds a readable one.
    pub async fn cached_user(&self) -> Option<User> {
        let session = self.inner.read().await;
        let value = session.user.clone()?;
        serde_json::from_value(value).ok()
    }

    /// Best-effort mirror to disk. Memory is authoritative; a failed write
    /// only costs session resume after restart.
    fn persist(&self, session: &StoredSession) {
        let Some(path) = &self.path else {
            return;
        };
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(session).unwrap_or_default();
            std::fs::write(path, contents)
        })();
        if let Err(error) = result {
            warn!(%error, path = %path.display(), "failed to persist session snapshot");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
