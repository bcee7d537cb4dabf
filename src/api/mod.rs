//! REST API client module for the CoroDesk backend.
//!
//! This module provides the `ApiClient` request gateway and the admin
//! surface layered on top of it. Calls resolve to an `ApiResponse`
//! envelope rather than failing; expired sessions are refreshed behind
//! the scenes, once per request.
//!
//! The API uses JWT bearer authentication with a rotating refresh token
//! obtained from `/auth/login`.

pub mod admin;
pub mod client;
pub mod error;
pub mod response;

pub use admin::AdminApi;
pub use client::ApiClient;
pub use error::{ApiError, AuthError};
pub use response::ApiResponse;

// Callers of `ApiClient::call` build these reqwest types directly
pub use reqwest::{header, Method};
