//! Document store abstraction.

use crate::error::StoreResult;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// Opaque token identifying one state of a collection document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentVersion(String);

impl DocumentVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fetched collection: entity name to fragment, plus its version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionedDocument {
    pub entries: Map<String, Value>,
    /// `None` when the backend does not version documents.
    pub version: Option<DocumentVersion>,
}

/// Precondition for a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCondition {
    /// Unconditional.
    Always,
    /// Only if the collection is still at this version.
    IfVersion(DocumentVersion),
    /// Only if the collection does not exist yet.
    IfAbsent,
}

/// A store of named collection documents.
///
/// Implementations must be safe to share between tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short name of the backend, for logs.
    fn backend_name(&self) -> &'static str;

    /// Fetches a whole collection.
    ///
    /// Fails with `StoreError::NotFound` if the collection has never been
    /// created; callers listing entities treat that as empty.
    async fn get_document(&self, collection: &str) -> StoreResult<VersionedDocument>;

    /// Deep-merges `patch` (RFC 7386) into the collection, creating it if
    /// absent. Keys not named in the patch are untouched; `null` deletes.
    ///
    /// Fails with `StoreError::Conflict` when `condition` does not hold.
    async fn merge_document(
        &self,
        collection: &str,
        patch: Map<String, Value>,
        condition: WriteCondition,
    ) -> StoreResult<()>;
}
