//! Store error types.

use nutrilog_core::ValidationError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The food cannot be logged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
