//! Fetch error types.

use nutrilog_core::{CoreError, ValidationError};
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for lookup operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote database answered with a non-success status.
    #[error("USDA error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        body: String,
    },

    /// HTTP request failed (network unreachable, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limited by the remote database.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after: Option<u64>,
    },

    /// Response body was not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response was structurally unusable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Core error (normalization).
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Required configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Returns true if this error came from talking to the remote database.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Status { .. }
                | Self::Http(_)
                | Self::RateLimited { .. }
                | Self::Json(_)
                | Self::InvalidResponse(_)
        )
    }

    /// Message suitable for showing to a user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Config(err) => err.to_string(),
            Self::RateLimited { .. } => {
                "The food database is busy. Please try again shortly.".to_string()
            }
            err if err.is_remote() => "Could not reach the food database.".to_string(),
            err => format!("Search failed: {err}"),
        }
    }
}

// ============================================================================
// Config Error
// ============================================================================

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The API key variable is unset or blank.
    #[error("Missing API key: set the {var} environment variable")]
    MissingApiKey {
        /// Environment variable name.
        var: String,
    },

    /// A variable is set but cannot be used.
    #[error("Invalid value for {var}: {reason}")]
    Invalid {
        /// Environment variable name.
        var: String,
        /// What was wrong.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_remote() {
        let err = FetchError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(err.is_remote());
        assert_eq!(err.to_string(), "USDA error 500: boom");
        assert_eq!(err.user_message(), "Could not reach the food database.");
    }

    #[test]
    fn test_validation_is_local() {
        let err = FetchError::from(ValidationError::EmptyQuery);
        assert!(!err.is_remote());
        assert_eq!(err.user_message(), "Please enter a search term.");
    }

    #[test]
    fn test_config_message_names_variable() {
        let err = FetchError::from(ConfigError::MissingApiKey {
            var: "USDA_API_KEY".to_string(),
        });
        assert!(!err.is_remote());
        assert!(err.user_message().contains("USDA_API_KEY"));
    }
}
