//! High-level session state on top of the API client.
//!
//! `AuthSession` tracks who is signed in. It is what an application shell
//! holds on to: login/register/logout plus `hydrate`, which restores a
//! session from the persisted snapshot on startup without forcing a
//! network round trip.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::api::{ApiClient, AuthError};
use crate::models::{User, UserRole};

pub struct AuthSession {
    client: Arc<ApiClient>,
    user: RwLock<Option<User>>,
}

impl AuthSession {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            user: RwLock::new(None),
        }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    /// Sign in and resolve the signed-in user. When the login response
    /// does not embed the user, it is fetched from `/auth/me`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Option<UserRole>,
    ) -> Result<User, AuthError> {
        let login = self.client.login(email, password, role).await?;
        let user = match login.user {
            Some(user) => user,
            None => self.client.current_user().await?,
        };
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    /// Create an account and sign straight in with it.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<User, AuthError> {
        let login = self.client.register(email, password, name).await?;
        let user = match login.user {
            Some(user) => user,
            None => self.client.current_user().await?,
        };
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    pub async fn logout(&self) {
        self.client.logout().await;
        *self.user.write().await = None;
    }

    /// Restore a session after startup. Prefers the user snapshot cached
    /// next to the tokens; falls back to `/auth/me` when the snapshot is
    /// missing. Returns `None` when there is no session to restore.
    pub async fn hydrate(&self) -> Option<User> {
        let store = self.client.token_store();
        store.read().await?;

        if let Some(user) = store.cached_user().await {
            debug!(email = %user.email, "restored session from snapshot");
            *self.user.write().await = Some(user.clone());
            return Some(user);
        }

        match self.client.current_user().await {
            Ok(user) => {
                *self.user.write().await = Some(user.clone());
                Some(user)
            }
            Err(error) => {
                debug!(%error, "could not restore session");
                None
            }
        }
    }

    /// Re-fetch the signed-in user from the API.
    pub async fn refresh_user(&self) -> Result<User, AuthError> {
        let user = self.client.current_user().await?;
        *self.user.write().await = Some(user.clone());
        Ok(user)
    }

    pub async fn current_user(&self) -> Option<User> {
        self.user.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }
}

// ============================================================================
// Tests
// ============================================================================
