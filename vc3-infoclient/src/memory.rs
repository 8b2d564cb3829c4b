//! In-process document store.
//!
//! Behaves like the information service: versioned collections, merge-patch
//! writes, conditional writes. Used by tests and by embedders that do not
//! need a remote service.

use crate::error::{StoreError, StoreResult};
use crate::patch::apply_merge_patch;
use crate::store::{DocumentStore, DocumentVersion, VersionedDocument, WriteCondition};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredCollection {
    document: Value,
    version: u64,
}

impl StoredCollection {
    fn version(&self) -> DocumentVersion {
        DocumentVersion::new(self.version.to_string())
    }
}

/// A [`DocumentStore`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, StoredCollection>>,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a collection with a raw document, bypassing validation.
    /// Useful for loading legacy or hand-written data.
    #[must_use]
    pub fn with_document(mut self, collection: &str, document: Value) -> Self {
        self.collections.get_mut().insert(
            collection.to_string(),
            StoredCollection {
                document,
                version: 1,
            },
        );
        self
    }

    /// Number of successful merges since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the current raw document of a collection.
    pub async fn snapshot(&self, collection: &str) -> Option<Value> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.document.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_document(&self, collection: &str) -> StoreResult<VersionedDocument> {
        let collections = self.collections.read().await;
        let stored = collections
            .get(collection)
            .ok_or_else(|| StoreError::NotFound(collection.to_string()))?;

        let entries = match &stored.document {
            Value::Object(entries) => entries.clone(),
            Value::Null => Map::new(),
            other => {
                return Err(StoreError::InvalidDocument {
                    collection: collection.to_string(),
                    reason: format!("expected an object, found {other}"),
                });
            }
        };
        Ok(VersionedDocument {
            entries,
            version: Some(stored.version()),
        })
    }

    async fn merge_document(
        &self,
        collection: &str,
        patch: Map<String, Value>,
        condition: WriteCondition,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let current = collections.get(collection);

        let allowed = match (&condition, current) {
            (WriteCondition::Always, _) => true,
            (WriteCondition::IfAbsent, existing) => existing.is_none(),
            (WriteCondition::IfVersion(expected), Some(stored)) => stored.version() == *expected,
            (WriteCondition::IfVersion(_), None) => false,
        };
        if !allowed {
            debug!(collection, ?condition, "conditional merge rejected");
            return Err(StoreError::Conflict(collection.to_string()));
        }

        let stored = collections
            .entry(collection.to_string())
            .or_insert_with(|| StoredCollection {
                document: Value::Object(Map::new()),
                version: 0,
            });
        apply_merge_patch(&mut stored.document, &Value::Object(patch));
        stored.version += 1;
        self.writes.fetch_add(1, Ordering::SeqCst);

        debug!(collection, version = stored.version, "merged document");
        Ok(())
    }
}
