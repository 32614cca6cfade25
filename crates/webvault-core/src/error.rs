//! Error types for WebVault.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias using WebVault's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for WebVault operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Website not found
    #[error("Website not found: {0}")]
    WebsiteNotFound(uuid::Uuid),

    /// Input failed schema validation (field-keyed messages)
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Invalid input that is not tied to a specific field
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Authentication required or session invalid
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Outbound HTTP request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("tag my-tag".to_string());
        assert_eq!(err.to_string(), "Not found: tag my-tag");
    }

    #[test]
    fn test_error_display_website_not_found() {
        let id = Uuid::nil();
        let err = Error::WebsiteNotFound(id);
        assert_eq!(err.to_string(), format!("Website not found: {}", id));
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("negative page".to_string());
        assert_eq!(err.to_string(), "Invalid input: negative page");
    }

    #[test]
    fn test_error_display_unauthorized() {
        let err = Error::Unauthorized("no active session".to_string());
        assert_eq!(err.to_string(), "Unauthorized: no active session");
    }

    #[test]
    fn test_error_display_validation_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("slug", "must match [a-z0-9-]+");
        let err: Error = errors.into();
        assert!(err.to_string().contains("slug"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
