//! API client for the CoroDesk choir-management REST API.
//!
//! This module provides the `ApiClient` struct: a request gateway that
//! attaches bearer tokens, folds every outcome into an `ApiResponse`
//! envelope, and transparently refreshes an expired session once per
//! request before giving up.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::auth::{RefreshCoordinator, RefreshError, TokenStore};
use crate::config::Config;
use crate::models::{
    AttendanceRecord, AttendanceStats, Event, EventStatus, Fee, FinanceSummary, LoginRequest,
    LoginResponse, MemberProfile, NewsItem, Page, ProfileUpdate, Rehearsal, TokenPair, User,
    UserRole,
};

use super::error::AuthError;
use super::{ApiError, ApiResponse};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s rides out a slow shared-hosting backend while still failing fast
/// enough that the UI can show something.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Query string helper
// ============================================================================

/// Append the present parameters to an endpoint as a query string.
pub(crate) fn build_query(endpoint: &str, params: &[(&str, Option<String>)]) -> String {
    let mut url = String::from(endpoint);
    let mut separator = '?';
    for (key, value) in params {
        if let Some(value) = value {
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(value);
            separator = '&';
        }
    }
    url
}

// ============================================================================
// Client
// ============================================================================

/// API client for CoroDesk.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the token store and refresh gate are shared Arcs.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<TokenStore>,
    refresh: Arc<RefreshCoordinator>,
    expired_tx: watch::Sender<bool>,
}

impl ApiClient {
    /// Create a new API client against `base_url`, sharing `store` with
    /// any other clients that should see the same session.
    pub fn new(base_url: impl Into<String>, store: Arc<TokenStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let (expired_tx, _) = watch::channel(false);

        Ok(Self {
            http,
            base_url: base_url.into(),
            store,
            refresh: Arc::new(RefreshCoordinator::new()),
            expired_tx,
        })
    }

    /// Create a client from the saved configuration, opening the session
    /// snapshot under the cache directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = TokenStore::open(config.session_dir()?);
        Self::new(config.resolved_base_url(), Arc::new(store))
    }

    /// Shared token store backing this client.
    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Whether the last refresh attempt ended the session. Cleared again
    /// by a successful login or register.
    pub fn session_expired(&self) -> bool {
        *self.expired_tx.borrow()
    }

    /// Watch for session-expiry so a UI can route to its login screen.
    pub fn subscribe_session_expired(&self) -> watch::Receiver<bool> {
        self.expired_tx.subscribe()
    }

    // ===== Request gateway =====

    /// Perform one API call. This never fails with an `Err`: network
    /// problems, bad bodies and HTTP errors all come back inside the
    /// envelope.
    ///
    /// On a 401 (unless `skip_auth_refresh`) the client refreshes the
    /// session and replays the request once with the new access token.
    /// If the refresh itself fails, the session is cleared and the call
    /// resolves to a terminal `"Session expired"` envelope.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
        extra_headers: Option<header::HeaderMap>,
        skip_auth_refresh: bool,
    ) -> ApiResponse<T> {
        debug!(%method, endpoint, "api call");
        let token = self.store.read().await.map(|pair| pair.access_token);

        let response = match self
            .send_once(
                method.clone(),
                endpoint,
                body.as_ref(),
                extra_headers.as_ref(),
                token.as_deref(),
            )
            .await
        {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, endpoint, "request failed before reaching the API");
                return ApiResponse::from_error(&ApiError::NetworkError(error));
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED && !skip_auth_refresh {
            // Without a stored session there is nothing to refresh; hand the
            // 401 back untouched (login attempts land here).
            if self.store.read().await.is_none() {
                return Self::finish(response).await;
            }

            debug!(endpoint, "got 401, refreshing session");
            return match self.refresh_access_token().await {
                Ok(access_token) => {
                    match self
                        .send_once(
                            method,
                            endpoint,
                            body.as_ref(),
                            extra_headers.as_ref(),
                            Some(&access_token),
                        )
                        .await
                    {
                        // Whatever the replay returns is final; a second 401
                        // does not trigger another refresh
                        Ok(retried) => Self::finish(retried).await,
                        Err(error) => ApiResponse::from_error(&ApiError::NetworkError(error)),
                    }
                }
                Err(error) => {
                    debug!(%error, endpoint, "refresh failed, session is over");
                    ApiResponse::from_error(&ApiError::SessionExpired)
                }
            };
        }

        Self::finish(response).await
    }

    /// Build and fire one HTTP request.
    async fn send_once(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        extra_headers: Option<&header::HeaderMap>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(headers) = extra_headers {
            request = request.headers(headers.clone());
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await
    }

    /// Resolve a response into the envelope: parse 2xx bodies, map the
    /// rest through `ApiError`.
    async fn finish<T: DeserializeOwned>(response: reqwest::Response) -> ApiResponse<T> {
        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => return ApiResponse::from_error(&ApiError::NetworkError(error)),
        };

        if status.is_success() {
            match serde_json::from_str(&body) {
                Ok(data) => ApiResponse::success(data, status.as_u16()),
                Err(error) => ApiResponse::from_error(&ApiError::InvalidResponse {
                    status: status.as_u16(),
                    reason: error.to_string(),
                }),
            }
        } else {
            ApiResponse::from_error(&ApiError::from_status(status, &body))
        }
    }

    // ===== Convenience wrappers =====

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.call(Method::GET, endpoint, None, None, false).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResponse<T> {
        match serde_json::to_value(body) {
            Ok(value) => self.call(Method::POST, endpoint, Some(value), None, false).await,
            Err(error) => Self::encoding_failure(error),
        }
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResponse<T> {
        match serde_json::to_value(body) {
            Ok(value) => self.call(Method::PUT, endpoint, Some(value), None, false).await,
            Err(error) => Self::encoding_failure(error),
        }
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.call(Method::DELETE, endpoint, None, None, false).await
    }

    /// A body that cannot be encoded never leaves the process; report it
    /// like the other never-reached-the-server failures.
    fn encoding_failure<T>(error: serde_json::Error) -> ApiResponse<T> {
        ApiResponse::from_error(&ApiError::InvalidResponse {
            status: 500,
            reason: format!("failed to encode request body: {error}"),
        })
    }

    // ===== Token refresh =====

    /// Exchange the stored refresh token for a new pair, collapsed to a
    /// single in-flight request no matter how many callers arrive.
    ///
    /// A failed exchange is the one place the session gets invalidated:
    /// the store is cleared and the expiry signal raised, exactly once,
    /// inside the cycle every waiter is attached to.
    async fn refresh_access_token(&self) -> Result<String, RefreshError> {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let store = Arc::clone(&self.store);
        let expired_tx = self.expired_tx.clone();

        self.refresh
            .run_exclusive(move || async move {
                let Some(pair) = store.read().await else {
                    return Err(RefreshError::NoSession);
                };
                match Self::request_refresh(&http, &base_url, &pair.refresh_token).await {
                    Ok(fresh) => {
                        store.write(&fresh).await;
                        debug!("session refreshed");
                        Ok(fresh.access_token)
                    }
                    Err(error) => {
                        warn!(%error, "token refresh rejected, clearing session");
                        store.clear().await;
                        expired_tx.send_replace(true);
                        Err(RefreshError::Failed(error.to_string()))
                    }
                }
            })
            .await
    }

    /// The raw refresh exchange. Deliberately bypasses the gateway: no
    /// bearer header, no envelope, no retry.
    async fn request_refresh(
        http: &Client,
        base_url: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, ApiError> {
        let url = format!("{}/auth/refresh", base_url);
        let response = http
            .post(&url)
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            serde_json::from_str(&body).map_err(|error| ApiError::InvalidResponse {
                status: status.as_u16(),
                reason: error.to_string(),
            })
        } else {
            Err(ApiError::from_status(status, &body))
        }
    }

    // ===== Auth operations =====

    /// Log in and persist the returned session.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Option<UserRole>,
    ) -> Result<LoginResponse, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "Email y contraseña son requeridos".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(AuthError::InvalidCredentials(
                "Formato de email inválido".to_string(),
            ));
        }

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };
        let response: ApiResponse<LoginResponse> = self.post("/auth/login", &request).await;
        let status = response.status;
        match (response.data, response.error) {
            (Some(login), _) => {
                self.adopt_session(&login).await;
                Ok(login)
            }
            (None, Some(message)) if status == 401 => Err(AuthError::InvalidCredentials(message)),
            (None, Some(message)) => Err(AuthError::Server(message)),
            (None, None) => Err(AuthError::Server("Unknown error occurred".to_string())),
        }
    }

    /// Register a new account; the API logs it straight in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<LoginResponse, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "Email y contraseña son requeridos".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(AuthError::InvalidCredentials(
                "Formato de email inválido".to_string(),
            ));
        }
        if password.len() < 8 {
            return Err(AuthError::InvalidCredentials(
                "La contraseña debe tener al menos 8 caracteres".to_string(),
            ));
        }

        let request = crate::models::RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.map(str::to_string),
        };
        let response: ApiResponse<LoginResponse> = self.post("/auth/register", &request).await;
        match (response.data, response.error) {
            (Some(login), _) => {
                self.adopt_session(&login).await;
                Ok(login)
            }
            (None, Some(message)) => Err(AuthError::Server(message)),
            (None, None) => Err(AuthError::Server("Unknown error occurred".to_string())),
        }
    }

    async fn adopt_session(&self, login: &LoginResponse) {
        self.store.write(&login.token_pair()).await;
        if let Some(user) = &login.user {
            self.store.store_user(user).await;
        }
        self.expired_tx.send_replace(false);
    }

    /// Fetch the signed-in user, caching the answer in the store.
    pub async fn current_user(&self) -> Result<User, AuthError> {
        if self.store.read().await.is_none() {
            return Err(AuthError::Unauthorized("No authenticated".to_string()));
        }

        let response: ApiResponse<User> = self.get("/auth/me").await;
        let status = response.status;
        match (response.data, response.error) {
            (Some(user), _) => {
                self.store.store_user(&user).await;
                Ok(user)
            }
            (None, Some(message)) if status == 401 => Err(AuthError::Unauthorized(message)),
            (None, Some(message)) => Err(AuthError::Server(message)),
            (None, None) => Err(AuthError::Server("Unknown error occurred".to_string())),
        }
    }

    /// Force a refresh cycle and return the resulting pair. Mostly useful
    /// for diagnostics; normal traffic refreshes lazily on 401.
    pub async fn refresh_session(&self) -> Result<TokenPair, AuthError> {
        if self.store.read().await.is_none() {
            return Err(AuthError::Unauthorized(
                "No refresh token available".to_string(),
            ));
        }

        match self.refresh_access_token().await {
            Ok(_) => match self.store.read().await {
                Some(pair) => Ok(pair),
                None => Err(AuthError::Unauthorized(
                    "No refresh token available".to_string(),
                )),
            },
            Err(RefreshError::NoSession) => Err(AuthError::Unauthorized(
                "No refresh token available".to_string(),
            )),
            Err(error) => Err(AuthError::Unauthorized(error.to_string())),
        }
    }

    /// End the session. The server call is best-effort; local state is
    /// dropped either way.
    pub async fn logout(&self) {
        if self.store.read().await.is_some() {
            let farewell: ApiResponse<serde_json::Value> = self
                .call(
                    Method::POST,
                    "/auth/logout",
                    Some(serde_json::json!({})),
                    None,
                    true,
                )
                .await;
            if let Some(error) = farewell.error {
                debug!(%error, "logout call failed, clearing session anyway");
            }
        }
        self.store.clear().await;
        self.expired_tx.send_replace(false);
    }

    // ===== Member endpoints =====

    /// Fetch the signed-in member's roster profile
    pub async fn fetch_profile(&self) -> ApiResponse<MemberProfile> {
        self.get("/members/profile").await
    }

    /// Update phone or voice part on the signed-in member's profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResponse<MemberProfile> {
        self.put("/members/profile", update).await
    }

    pub async fn fetch_member(&self, id: &str) -> ApiResponse<MemberProfile> {
        self.get(&format!("/members/{}", id)).await
    }

    pub async fn fetch_rehearsals(&self) -> ApiResponse<Vec<Rehearsal>> {
        self.get("/rehearsals").await
    }

    /// Rehearsals that have not happened yet
    pub async fn fetch_upcoming_rehearsals(&self) -> ApiResponse<Vec<Rehearsal>> {
        self.get("/rehearsals?state=scheduled").await
    }

    pub async fn fetch_rehearsal(&self, id: &str) -> ApiResponse<Rehearsal> {
        self.get(&format!("/rehearsals/{}", id)).await
    }

    pub async fn fetch_my_attendance(&self) -> ApiResponse<Vec<AttendanceRecord>> {
        self.get("/attendance/me").await
    }

    pub async fn fetch_attendance_stats(&self) -> ApiResponse<AttendanceStats> {
        self.get("/attendance/me/stats").await
    }

    pub async fn fetch_attendance_record(&self, id: &str) -> ApiResponse<AttendanceRecord> {
        self.get(&format!("/attendance/{}", id)).await
    }

    /// The signed-in member's outstanding fees
    pub async fn fetch_my_fees(&self) -> ApiResponse<Vec<Fee>> {
        self.get("/finance/me").await
    }

    /// The signed-in member's settled fees
    pub async fn fetch_fee_history(&self) -> ApiResponse<Vec<Fee>> {
        self.get("/finance/me/history").await
    }

    pub async fn fetch_finance_summary(&self) -> ApiResponse<FinanceSummary> {
        self.get("/finance/me/summary").await
    }

    pub async fn fetch_fee(&self, id: &str) -> ApiResponse<Fee> {
        self.get(&format!("/finance/{}", id)).await
    }

    /// Everything the member home screen needs, fetched concurrently.
    pub async fn fetch_corista_dashboard(
        &self,
    ) -> (ApiResponse<Vec<Rehearsal>>, ApiResponse<AttendanceStats>) {
        futures::future::join(
            self.get("/rehearsals?limit=5"),
            self.get("/attendance/me/stats"),
        )
        .await
    }

    // ===== Public endpoints =====

    /// Public event listing. Without a status filter the API only returns
    /// events that are planned or in progress.
    pub async fn fetch_public_events(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        status: Option<EventStatus>,
    ) -> ApiResponse<Vec<Event>> {
        let endpoint = build_query(
            "/events/public",
            &[
                ("limit", limit.map(|v| v.to_string())),
                ("offset", offset.map(|v| v.to_string())),
                ("estado", status.map(|s| s.as_str().to_string())),
            ],
        );
        self.get(&endpoint).await
    }

    pub async fn fetch_event(&self, id: &str) -> ApiResponse<Event> {
        self.get(&format!("/events/{}", id)).await
    }

    /// News addressed to everyone, newest first
    pub async fn fetch_public_news(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> ApiResponse<Vec<NewsItem>> {
        let endpoint = build_query(
            "/news/public",
            &[
                ("limit", limit.map(|v| v.to_string())),
                ("offset", offset.map(|v| v.to_string())),
            ],
        );
        self.get(&endpoint).await
    }

    pub async fn fetch_news_item(&self, id: &str) -> ApiResponse<NewsItem> {
        self.get(&format!("/news/{}", id)).await
    }

    /// Static page content (historia, mision, vision, contacto)
    pub async fn fetch_page(&self, slug: &str) -> ApiResponse<Page> {
        self.get(&format!("/pages/{}", slug)).await
    }
}

// ============================================================================
// Tests
// ============================================================================
