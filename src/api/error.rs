use serde::Deserialize;
use thiserror::Error;

/// Failures surfaced by the request gateway. These never escape as panics
/// or raw `Err` values from the gateway itself; `call` folds them into the
/// response envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response (status {status}): {reason}")]
    InvalidResponse { status: u16, reason: String },

    #[error("Session expired")]
    SessionExpired,

    #[error("{message}")]
    Status { status: u16, message: String },
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Status code reported through the response envelope.
    /// Failures that never reached the server count as 500.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NetworkError(_) => 500,
            ApiError::InvalidResponse { status, .. } => *status,
            ApiError::SessionExpired => 401,
            ApiError::Status { status, .. } => *status,
        }
    }

    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            // Messages are mostly Spanish; the cut must land on a char boundary
            let mut cut = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..cut],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            message: Self::error_message(status, body),
        }
    }

    /// Message for a non-2xx response: the body's `message` (or FastAPI's
    /// `detail`) when present, otherwise the status reason phrase.
    fn error_message(status: reqwest::StatusCode, body: &str) -> String {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            detail: Option<String>,
        }

        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
            if let Some(message) = parsed.message.or(parsed.detail) {
                if !message.is_empty() {
                    return Self::truncate_body(&message);
                }
            }
        }

        match status.canonical_reason() {
            Some(reason) => reason.to_string(),
            None => format!("HTTP {}", status.as_u16()),
        }
    }
}

/// Failures from the auth operations (login, register, current user).
/// Cloneable so callers can stash the error alongside UI state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Rejected credentials, including client-side validation failures.
    #[error("{0}")]
    InvalidCredentials(String),

    /// No usable session: missing tokens or a 401 from the API.
    #[error("{0}")]
    Unauthorized(String),

    /// Anything else the server refused.
    #[error("{0}")]
    Server(String),
}

// ============================================================================
// Tests
// ============================================================================
