//! Core error types for `NutriLog`.

use thiserror::Error;

/// Minimum number of characters an explicit search or suggestion needs.
pub const MIN_QUERY_CHARS: usize = 2;

/// User input that fails a precondition.
///
/// These are recovered where they happen and shown inline; the `Display`
/// text is the message a user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The query was empty after trimming.
    #[error("Please enter a search term.")]
    EmptyQuery,

    /// The query was shorter than the minimum length.
    #[error("Please enter at least {min} characters.")]
    QueryTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },

    /// A manual entry had no name.
    #[error("Please enter a meal name.")]
    EmptyMealName,

    /// A food without all four macros was offered to the log.
    #[error("Nutritional information incomplete. Cannot add to log.")]
    IncompleteNutrition {
        /// Display name of the rejected food.
        name: String,
    },
}

impl ValidationError {
    /// Checks a free-text query for an explicit search.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyQuery`] for blank input and
    /// [`ValidationError::QueryTooShort`] below [`MIN_QUERY_CHARS`].
    pub fn check_query(query: &str) -> Result<&str, ValidationError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            return Err(ValidationError::QueryTooShort {
                min: MIN_QUERY_CHARS,
            });
        }
        Ok(trimmed)
    }
}

/// Core error type for `NutriLog` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data in a remote record.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_query_trims() {
        assert_eq!(ValidationError::check_query("  apple "), Ok("apple"));
    }

    #[test]
    fn test_check_query_rejects_blank_and_short() {
        assert_eq!(
            ValidationError::check_query("   "),
            Err(ValidationError::EmptyQuery)
        );
        assert_eq!(
            ValidationError::check_query(" a "),
            Err(ValidationError::QueryTooShort { min: 2 })
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::QueryTooShort { min: 2 }.to_string(),
            "Please enter at least 2 characters."
        );
        let err = ValidationError::IncompleteNutrition {
            name: "Mystery".to_string(),
        };
        assert!(err.to_string().contains("incomplete"));
    }
}
