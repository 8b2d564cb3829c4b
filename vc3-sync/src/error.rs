//! Error types for the sync layer.

use thiserror::Error;
use vc3_infoclient::StoreError;
use vc3_model::{EntityKind, ModelError};

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors surfaced by the sync layer and the client facade.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed or missing fields; never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// A stored fragment does not decode into its entity type.
    #[error("cannot deserialize {kind} '{name}': {reason}")]
    Deserialization {
        kind: EntityKind,
        name: String,
        reason: String,
    },

    /// The named entity does not exist.
    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    /// Storing would clobber an existing entity.
    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: EntityKind, name: String },

    /// Transport or backend failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Every attempt lost against a concurrent writer.
    #[error("gave up writing to '{collection}' after {attempts} conflicting attempts")]
    ConflictRetriesExhausted { collection: String, attempts: u32 },
}

impl SyncError {
    pub(crate) fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        SyncError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// True for a missing entity or a missing collection.
    pub fn is_not_found(&self) -> bool {
        match self {
            SyncError::NotFound { .. } => true,
            SyncError::Store(e) => e.is_not_found(),
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, SyncError::Store(e) if e.is_timeout())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Validation(_))
    }
}

impl From<ModelError> for SyncError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(message) => SyncError::Validation(message),
            ModelError::Deserialization { kind, name, reason } => {
                SyncError::Deserialization { kind, name, reason }
            }
        }
    }
}
