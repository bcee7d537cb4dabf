use super::error::ApiError;

/// Uniform envelope every gateway call resolves to. Exactly one of `data`
/// and `error` is set; `status` always carries the HTTP status the outcome
/// was decided on (500 when the request never reached the server).
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, status: u16) -> Self {
        Self {
            data: Some(data),
            error: None,
            status,
        }
    }

    pub fn from_error(error: &ApiError) -> Self {
        Self {
            data: None,
            error: Some(error.to_string()),
            status: error.status(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }

    /// Consume the envelope, keeping the payload and dropping the rest.
    pub fn ok(self) -> Option<T> {
        self.data
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_data_and_status() {
        let response = ApiResponse::success(vec![1, 2, 3], 200);
        assert!(response.is_success());
        assert_eq!(response.status, 200);
        assert_eq!(response.ok(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn error_envelope_has_no_data() {
        let error = ApiError::Status {
            status: 404,
            message: "Event not found".to_string(),
        };
        let response = ApiResponse::<()>::from_error(&error);
        assert!(!response.is_success());
        assert_eq!(response.status, 404);
        assert_eq!(response.error.as_deref(), Some("Event not found"));
    }
}
