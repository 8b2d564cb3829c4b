//! Error types for the entity model.

use crate::EntityKind;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while defining or (de)serializing entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A field is missing or malformed at definition time.
    #[error("validation error: {0}")]
    Validation(String),

    /// A stored fragment could not be turned back into its entity type.
    #[error("cannot deserialize {kind} '{name}': {reason}")]
    Deserialization {
        kind: EntityKind,
        name: String,
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ModelError::Validation(message.into())
    }

    /// Returns true for definition-time validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, ModelError::Validation(_))
    }
}
