//! End-to-end auth flows against a mock API: login, register, session
//! restore, refresh, logout.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use corodesk::api::{ApiClient, AuthError};
use corodesk::auth::{AuthSession, TokenStore};
use corodesk::models::{TokenPair, UserRole};

// ===== Mock API =====

#[derive(Default)]
struct AuthApi {
    me_hits: AtomicUsize,
}

fn corista_user() -> Value {
    json!({
        "id": "u-1",
        "email": "ana@coro.example",
        "nombre": "Ana Solís",
        "userType": "corista",
        "createdAt": "2024-03-01T12:00:00Z"
    })
}

fn admin_user() -> Value {
    json!({
        "id": "u-9",
        "email": "dir@coro.example",
        "nombre": "Directora",
        "userType": "admin"
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (email, password) {
        ("boom@coro.example", _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Internal boom" })),
        )
            .into_response(),
        // The director account only opens when the admin role is asked for,
        // which pins down what the login request puts on the wire.
        ("dir@coro.example", "secreto123") if body["userType"] == "admin" => (
            StatusCode::OK,
            Json(json!({
                "accessToken": "a1",
                "refreshToken": "r1",
                "user": admin_user()
            })),
        )
            .into_response(),
        ("ana@coro.example", "secreto123") => (
            StatusCode::OK,
            Json(json!({
                "accessToken": "a1",
                "refreshToken": "r1",
                "user": corista_user()
            })),
        )
            .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response(),
    }
}

async fn register(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == "existing@coro.example" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "El email ya está registrado" })),
        )
            .into_response();
    }
    let user = json!({
        "id": "u-2",
        "email": body["email"],
        "nombre": body["nombre"],
        "userType": "corista"
    });
    (
        StatusCode::CREATED,
        Json(json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "user": user
        })),
    )
        .into_response()
}

async fn me(State(api): State<Arc<AuthApi>>, headers: HeaderMap) -> impl IntoResponse {
    api.me_hits.fetch_add(1, Ordering::SeqCst);
    if bearer(&headers) == Some("a1") {
        (StatusCode::OK, Json(corista_user())).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized" })),
        )
            .into_response()
    }
}

async fn refresh(Json(body): Json<Value>) -> impl IntoResponse {
    if body["refreshToken"] == "r1" {
        (
            StatusCode::OK,
            Json(json!({ "accessToken": "a2", "refreshToken": "r2" })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid refresh token" })),
        )
            .into_response()
    }
}

async fn logout() -> Json<Value> {
    Json(json!({ "message": "Sesión cerrada" }))
}

async fn spawn_auth_api(api: Arc<AuthApi>) -> String {
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .with_state(api);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn session_against(api: Arc<AuthApi>) -> (AuthSession, Arc<TokenStore>) {
    let base_url = spawn_auth_api(api).await;
    let store = Arc::new(TokenStore::in_memory());
    let client = ApiClient::new(base_url, store.clone()).unwrap();
    (AuthSession::new(Arc::new(client)), store)
}

// ===== Login =====

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_stores_tokens_and_user_snapshot() {
    let api = Arc::new(AuthApi::default());
    let (session, store) = session_against(api.clone()).await;

    let user = session
        .login("ana@coro.example", "secreto123", None)
        .await
        .unwrap();

    assert_eq!(user.email, "ana@coro.example");
    assert_eq!(user.name.as_deref(), Some("Ana Solís"));
    assert_eq!(user.role, UserRole::Corista);
    assert!(session.is_authenticated().await);
    assert_eq!(store.read().await, Some(TokenPair::new("a1", "r1")));
    let snapshot = store.cached_user().await.unwrap();
    assert_eq!(snapshot.email, "ana@coro.example");
    // The login response embeds the user, so /auth/me is never needed.
    assert_eq!(api.me_hits.load(Ordering::SeqCst), 0);
    assert!(!session.client().session_expired());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_sends_the_requested_role() {
    let api = Arc::new(AuthApi::default());
    let (session, _store) = session_against(api).await;

    let user = session
        .login("dir@coro.example", "secreto123", Some(UserRole::Admin))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Admin);
    assert!(user.is_admin());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn login_rejection_is_invalid_credentials() {
    let api = Arc::new(AuthApi::default());
    let (session, store) = session_against(api).await;

    let error = session
        .login("ana@coro.example", "wrong-password", None)
        .await
        .unwrap_err();

    assert_eq!(
        error,
        AuthError::InvalidCredentials("Unauthorized".to_string())
    );
    assert!(!session.is_authenticated().await);
    assert_eq!(store.read().await, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_failure_during_login_is_a_server_error() {
    let api = Arc::new(AuthApi::default());
    let (session, _store) = session_against(api).await;

    let error = session
        .login("boom@coro.example", "secreto123", None)
        .await
        .unwrap_err();

    assert_eq!(error, AuthError::Server("Internal boom".to_string()));
}

// ===== Register =====

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn register_signs_the_new_account_in() {
    let api = Arc::new(AuthApi::default());
    let (session, store) = session_against(api).await;

    let user = session
        .register("nueva@coro.example", "secreto123", Some("Nueva Voz"))
        .await
        .unwrap();

    assert_eq!(user.email, "nueva@coro.example");
    assert_eq!(user.name.as_deref(), Some("Nueva Voz"));
    assert!(session.is_authenticated().await);
    assert_eq!(store.read().await, Some(TokenPair::new("a1", "r1")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn register_conflict_is_a_server_error() {
    let api = Arc::new(AuthApi::default());
    let (session, store) = session_against(api).await;

    let error = session
        .register("existing@coro.example", "secreto123", Some("Ana"))
        .await
        .unwrap_err();

    assert_eq!(
        error,
        AuthError::Server("El email ya está registrado".to_string())
    );
    assert_eq!(store.read().await, None);
}

// ===== Session restore and teardown =====

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn hydrate_fetches_the_user_when_snapshot_is_missing() {
    let api = Arc::new(AuthApi::default());
    let (session, store) = session_against(api.clone()).await;
    store.write(&TokenPair::new("a1", "r1")).await;

    let user = session.hydrate().await.unwrap();

    assert_eq!(user.email, "ana@coro.example");
    assert_eq!(api.me_hits.load(Ordering::SeqCst), 1);
    // The fetched user is cached so the next startup skips the call.
    assert!(store.cached_user().await.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn logout_clears_local_state() {
    let api = Arc::new(AuthApi::default());
    let (session, store) = session_against(api).await;
    session
        .login("ana@coro.example", "secreto123", None)
        .await
        .unwrap();

    session.logout().await;

    assert!(!session.is_authenticated().await);
    assert_eq!(store.read().await, None);
    assert!(store.cached_user().await.is_none());
    assert!(!session.client().session_expired());
}

// ===== Manual refresh =====

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_session_rotates_the_stored_pair() {
    let api = Arc::new(AuthApi::default());
    let (session, store) = session_against(api).await;
    store.write(&TokenPair::new("a1", "r1")).await;

    let pair = session.client().refresh_session().await.unwrap();

    assert_eq!(pair, TokenPair::new("a2", "r2"));
    assert_eq!(store.read().await, Some(pair));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_session_without_a_session_is_unauthorized() {
    let api = Arc::new(AuthApi::default());
    let (session, _store) = session_against(api).await;

    let error = session.client().refresh_session().await.unwrap_err();

    assert_eq!(
        error,
        AuthError::Unauthorized("No refresh token available".to_string())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn current_user_requires_a_session() {
    let api = Arc::new(AuthApi::default());
    let (session, _store) = session_against(api).await;

    let error = session.client().current_user().await.unwrap_err();

    assert_eq!(error, AuthError::Unauthorized("No authenticated".to_string()));
}
