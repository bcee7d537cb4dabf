//! Authentication module for managing user sessions and credentials.
//!
//! This module provides:
//! - `TokenStore`: shared access/refresh token pair with disk persistence
//! - `RefreshCoordinator`: collapses concurrent token refreshes into one
//! - `AuthSession`: who-is-signed-in state for an application shell
//! - `CredentialStore`: secure OS-level credential storage via keyring
//!
//! Tokens are persisted to a session snapshot and survive restarts; the
//! API decides when they expire.

pub mod credentials;
pub mod refresh;
pub mod session;
pub mod store;

pub use credentials::CredentialStore;
pub use refresh::{RefreshCoordinator, RefreshError};
pub use session::AuthSession;
pub use store::TokenStore;
