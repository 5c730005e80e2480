//! Taskboard API-specific error types.

use crate::session::SessionError;

/// Errors that can occur during Taskboard API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Response parsed as JSON but violates the expected shape
    #[error("Malformed API payload: {0}")]
    MalformedPayload(String),

    /// Session storage could not be read or written
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Returns true when the server answered 404.
    ///
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Returns true when the server rejected the bearer token.
    ///
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ApiError::MalformedPayload("column without _id".to_string());
        assert!(error.to_string().contains("Malformed API payload"));
        assert!(error.to_string().contains("column without _id"));

        let error = ApiError::Session(SessionError::Corrupt("bad yaml".to_string()));
        assert!(error.to_string().contains("Session error"));
    }

    #[test]
    fn test_api_error_status() {
        let error = ApiError::Status {
            status: 404,
            message: "Board not found".to_string(),
        };
        let error_str = error.to_string();
        assert!(error_str.contains("404"));
        assert!(error_str.contains("Board not found"));
        assert!(error.is_not_found());
        assert!(!error.is_unauthorized());
    }

    #[test]
    fn test_api_error_unauthorized() {
        let error = ApiError::Status {
            status: 401,
            message: "Not authorized, no token".to_string(),
        };
        assert!(error.is_unauthorized());
        assert!(!error.is_not_found());
    }
}
