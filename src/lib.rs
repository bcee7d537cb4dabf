//! Core client library for CoroDesk, a choir-management platform.
//!
//! This crate is the front end's data layer: an authenticated API client
//! with transparent token refresh, persistent session state, and the
//! models for rosters, rehearsals, attendance, fees, events and news.
//!
//! The pieces fit together like this:
//!
//! - [`config::Config`] resolves where the API lives and where local
//!   state goes.
//! - [`auth::TokenStore`] holds the access/refresh token pair, mirrored
//!   to disk so sessions survive restarts.
//! - [`api::ApiClient`] is the request gateway. Every call resolves to an
//!   [`api::ApiResponse`] envelope; a 401 triggers one coordinated token
//!   refresh and one replay before the call reports failure.
//! - [`auth::AuthSession`] layers who-is-signed-in state on top, for an
//!   application shell to hold.
//!
//! ```no_run
//! use std::sync::Arc;
//! use corodesk::api::ApiClient;
//! use corodesk::auth::AuthSession;
//! use corodesk::config::Config;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let client = Arc::new(ApiClient::from_config(&config)?);
//! let session = AuthSession::new(client.clone());
//!
//! if session.hydrate().await.is_none() {
//!     session.login("ana@coro.example", "secreto123", None).await?;
//! }
//! let rehearsals = client.fetch_upcoming_rehearsals().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{AdminApi, ApiClient, ApiError, ApiResponse, AuthError};
pub use auth::{AuthSession, CredentialStore, RefreshCoordinator, RefreshError, TokenStore};
pub use config::Config;
