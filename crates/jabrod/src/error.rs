//! Client error types.

use thiserror::Error;

/// Error code used when the server does not supply one.
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";

/// Error message used when the server does not supply one.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a local file for upload failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server returned an error response, or an envelope with `success: false`.
    #[error("API error ({status}) {code}: {message}")]
    Api {
        /// HTTP status code of the exchange.
        status: u16,
        /// Error code from server.
        code: String,
        /// Error message from server.
        message: String,
        /// Structured details, passed through as sent.
        details: Option<serde_json::Value>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A builder was executed without a required field.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Build an API error, falling back to the unknown-error defaults for
    /// missing or empty fields.
    pub(crate) fn api(
        status: u16,
        code: Option<String>,
        message: Option<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        Error::Api {
            status,
            code: code
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string()),
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
            details,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server error code of an API error.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api { status: 401 | 403, .. })
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Api { status: 429, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_defaults_when_fields_missing() {
        let err = Error::api(500, None, None, None);
        match err {
            Error::Api {
                status,
                code,
                message,
                details,
            } => {
                assert_eq!(status, 500);
                assert_eq!(code, UNKNOWN_ERROR_CODE);
                assert_eq!(message, UNKNOWN_ERROR_MESSAGE);
                assert!(details.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_defaults_when_fields_empty() {
        let err = Error::api(400, Some(String::new()), Some(String::new()), None);
        assert_eq!(err.code(), Some(UNKNOWN_ERROR_CODE));
        assert_eq!(
            err.to_string(),
            "API error (400) UNKNOWN_ERROR: An unknown error occurred"
        );
    }

    #[test]
    fn test_status_predicates() {
        assert!(Error::api(404, None, None, None).is_not_found());
        assert!(Error::api(401, None, None, None).is_auth_error());
        assert!(Error::api(403, None, None, None).is_auth_error());
        assert!(Error::api(429, None, None, None).is_rate_limited());
        assert!(Error::api(503, None, None, None).is_server_error());
        assert!(!Error::api(200, None, None, None).is_server_error());
        assert!(!Error::Validation("x".into()).is_not_found());
        assert_eq!(Error::Config("x".into()).status(), None);
    }
}
