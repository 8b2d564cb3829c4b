//! Store error types.

use std::time::Duration;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur talking to a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The collection has never been written.
    #[error("collection not found: {0}")]
    NotFound(String),

    /// The store did not answer within the configured timeout.
    #[error("store request timed out after {0:?}")]
    Timeout(Duration),

    /// A conditional write lost against a concurrent writer.
    #[error("write conflict on collection '{0}'")]
    Conflict(String),

    /// Connection-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered with an unexpected status.
    #[error("store returned HTTP {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store returned a document of the wrong shape.
    #[error("invalid document for collection '{collection}': {reason}")]
    InvalidDocument { collection: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }

    /// Returns true if the same call may succeed later unchanged. A
    /// `Conflict` is not retryable as is: the caller must re-read first.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Timeout(_) | StoreError::Transport(_) => true,
            StoreError::Backend { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
