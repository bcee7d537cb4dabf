use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform role attached to every account.
/// Admins implicitly satisfy every role requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Corista,
    Public,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Corista => "corista",
            UserRole::Public => "public",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "Administrador"),
            UserRole::Corista => write!(f, "Corista"),
            UserRole::Public => write!(f, "Público"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    // /auth/me responses omit userType; accounts default to corista
    #[serde(rename = "userType", default)]
    pub role: UserRole,
    #[serde(rename = "createdAt", alias = "created_at", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", alias = "updated_at", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether this user may access a surface gated on `required`.
    /// Admins pass every gate.
    pub fn can_access(&self, required: UserRole) -> bool {
        self.role == required || self.role == UserRole::Admin
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Body for `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "userType", skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Body for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response from `POST /auth/login` and `POST /auth/register`.
/// The API has emitted both camelCase and snake_case token fields over time,
/// so both spellings are accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(rename = "accessToken", alias = "access_token")]
    pub access_token: String,
    #[serde(rename = "refreshToken", alias = "refresh_token")]
    pub refresh_token: String,
}

impl LoginResponse {
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Bearer/refresh token pair. Opaque to the client; the API controls both
/// lifetimes. Stored together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken", alias = "access_token")]
    pub access_token: String,
    #[serde(rename = "refreshToken", alias = "refresh_token")]
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_user_without_role_defaults_to_corista() {
        let json = r#"{"id": "u-1", "email": "ana@coro.example"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Corista);
        assert_eq!(user.display_name(), "ana@coro.example");
    }

    #[test]
    fn parse_login_response_accepts_both_token_spellings() {
        let camel = r#"{"accessToken": "a1", "refreshToken": "r1"}"#;
        let snake = r#"{"access_token": "a1", "refresh_token": "r1", "token_type": "bearer", "expires_in": 1800}"#;

        let from_camel: LoginResponse = serde_json::from_str(camel).unwrap();
        let from_snake: LoginResponse = serde_json::from_str(snake).unwrap();

        assert_eq!(from_camel.token_pair(), from_snake.token_pair());
        assert!(from_camel.user.is_none());
    }

    #[test]
    fn admin_passes_every_role_gate() {
        let json = r#"{"id": "u-2", "email": "dir@coro.example", "nombre": "Dirección", "userType": "admin"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_admin());
        assert!(user.can_access(UserRole::Corista));
        assert!(user.can_access(UserRole::Public));
    }

    #[test]
    fn login_request_omits_role_when_unset() {
        let request = LoginRequest {
            email: "ana@coro.example".to_string(),
            password: "secreto123".to_string(),
            role: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("userType").is_none());
    }
}
