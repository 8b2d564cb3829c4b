//! Sync engine: typed reads and conflict-checked writes over a store.

use crate::config::{DuplicatePolicy, SyncConfig};
use crate::error::{SyncError, SyncResult};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use vc3_infoclient::{merge_diff, DocumentStore, StoreError, VersionedDocument, WriteCondition};
use vc3_model::{DocumentEntity, EntityKind, EntityName, Fragment};

/// A fragment that could not be decoded during a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFragment {
    pub name: String,
    pub reason: String,
}

/// Outcome of scanning a collection.
#[derive(Debug, Clone)]
pub struct ListReport<E> {
    /// Entities that decoded, in key order.
    pub entities: Vec<E>,
    /// Fragments that did not.
    pub skipped: Vec<SkippedFragment>,
}

/// Reads and writes typed entities through a [`DocumentStore`].
///
/// Holds no state between calls besides the store handle, so clones are
/// cheap and may be used from many tasks at once.
#[derive(Clone)]
pub struct SyncEngine {
    store: Arc<dyn DocumentStore>,
    config: SyncConfig,
}

impl SyncEngine {
    /// Creates an engine with the default config.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, SyncConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStore>, config: SyncConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Fetches a collection, mapping "never created" to `None`.
    async fn fetch(&self, collection: &str) -> SyncResult<Option<VersionedDocument>> {
        match self.store.get_document(collection).await {
            Ok(document) => Ok(Some(document)),
            Err(StoreError::NotFound(_)) => {
                debug!(collection, "collection does not exist yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn entries(&self, kind: EntityKind) -> SyncResult<Map<String, Value>> {
        Ok(self
            .fetch(kind.collection())
            .await?
            .map(|document| document.entries)
            .unwrap_or_default())
    }

    /// Decodes every fragment of `E`'s collection, reporting the ones that
    /// fail instead of failing the scan.
    pub async fn scan<E: DocumentEntity>(&self) -> SyncResult<ListReport<E>> {
        let entries = self.entries(E::KIND).await?;
        let mut report = ListReport {
            entities: Vec::with_capacity(entries.len()),
            skipped: Vec::new(),
        };

        for (name, value) in &entries {
            match E::from_value(name, value) {
                Ok(entity) => report.entities.push(entity),
                Err(err) => {
                    warn!(collection = E::KIND.collection(), %name, error = %err, "skipping unreadable fragment");
                    report.skipped.push(SkippedFragment {
                        name: name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        debug!(
            collection = E::KIND.collection(),
            loaded = report.entities.len(),
            skipped = report.skipped.len(),
            "scanned collection"
        );
        Ok(report)
    }

    /// Lists every readable entity of type `E`. A missing collection is an
    /// empty list.
    pub async fn list<E: DocumentEntity>(&self) -> SyncResult<Vec<E>> {
        Ok(self.scan::<E>().await?.entities)
    }

    /// Fetches one entity by name.
    ///
    /// Reads the same whole-collection document as [`list`](Self::list), so
    /// both always agree. Unlike `list`, a malformed target fragment is an
    /// error here.
    pub async fn get<E: DocumentEntity>(&self, name: &str) -> SyncResult<E> {
        let entries = self.entries(E::KIND).await?;
        let value = entries
            .get(name)
            .ok_or_else(|| SyncError::not_found(E::KIND, name))?;
        Ok(E::from_value(name, value)?)
    }

    /// Returns whether an entity named `name` exists in `E`'s collection.
    pub async fn exists<E: DocumentEntity>(&self, name: &str) -> SyncResult<bool> {
        Ok(self.entries(E::KIND).await?.contains_key(name))
    }

    /// Checks that every name exists in `kind`'s collection, fetching it once.
    /// Fails with `NotFound` for the first missing name.
    pub async fn require<'a, I>(&self, kind: EntityKind, names: I) -> SyncResult<()>
    where
        I: IntoIterator<Item = &'a EntityName>,
    {
        let mut names = names.into_iter().peekable();
        if names.peek().is_none() {
            return Ok(());
        }
        let entries = self.entries(kind).await?;
        match names.find(|n| !entries.contains_key(n.as_str())) {
            Some(missing) => Err(SyncError::not_found(kind, missing.as_str())),
            None => Ok(()),
        }
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Stores a new entity.
    ///
    /// If the name is taken, `DuplicatePolicy::Reject` fails with
    /// `AlreadyExists` and `DuplicatePolicy::Overwrite` replaces it.
    pub async fn create<E: DocumentEntity>(&self, entity: &E) -> SyncResult<()> {
        let (name, fragment) = entity.to_fragment()?;
        let policy = self.config.duplicate_policy;
        self.write_entity(E::KIND, name.as_str(), |current| match (current, policy) {
            (Some(_), DuplicatePolicy::Reject) => Err(SyncError::AlreadyExists {
                kind: E::KIND,
                name: name.to_string(),
            }),
            _ => Ok((Some(fragment.clone()), ())),
        })
        .await
    }

    /// Replaces an existing entity wholesale. Fails with `NotFound` if there
    /// is nothing to replace.
    pub async fn replace<E: DocumentEntity>(&self, entity: &E) -> SyncResult<()> {
        let (name, fragment) = entity.to_fragment()?;
        self.write_entity(E::KIND, name.as_str(), |current| match current {
            Some(_) => Ok((Some(fragment.clone()), ())),
            None => Err(SyncError::not_found(E::KIND, name.as_str())),
        })
        .await
    }

    /// Read-modify-write of one entity.
    ///
    /// `modify` receives a freshly loaded copy and returns whether it changed
    /// anything; unchanged entities are not written. On a conflicting
    /// concurrent write the entity is reloaded and `modify` runs again, so it
    /// must be safe to call more than once. Returns the entity as stored.
    pub async fn update_with<E, F>(&self, name: &str, mut modify: F) -> SyncResult<E>
    where
        E: DocumentEntity,
        F: FnMut(&mut E) -> SyncResult<bool> + Send,
    {
        self.write_entity(E::KIND, name, |current| {
            let value = current.ok_or_else(|| SyncError::not_found(E::KIND, name))?;
            let mut entity = E::from_value(name, value)?;
            if !modify(&mut entity)? {
                return Ok((None, entity));
            }
            let (_, fragment) = entity.to_fragment()?;
            Ok((Some(fragment), entity))
        })
        .await
    }

    /// The single write path: fetch, decide, patch with a version check,
    /// retry on conflict.
    ///
    /// `decide` gets the current raw fragment (if any) and returns the new
    /// fragment, or `None` to skip writing, plus a value handed back to the
    /// caller.
    async fn write_entity<T, F>(&self, kind: EntityKind, name: &str, mut decide: F) -> SyncResult<T>
    where
        T: Send,
        F: FnMut(Option<&Value>) -> SyncResult<(Option<Fragment>, T)> + Send,
    {
        let collection = kind.collection();
        let attempts = self.config.attempts();

        for attempt in 1..=attempts {
            let document = self.fetch(collection).await?;
            let current = document.as_ref().and_then(|d| d.entries.get(name));
            let (next, outcome) = decide(current)?;

            let Some(next) = next else {
                debug!(collection, name, "entity unchanged; nothing to write");
                return Ok(outcome);
            };
            let fragment_patch = match current {
                Some(old) => match merge_diff(old, &Value::Object(next)) {
                    Some(diff) => diff,
                    None => {
                        debug!(collection, name, "stored fragment already up to date");
                        return Ok(outcome);
                    }
                },
                None => Value::Object(next),
            };

            let condition = match &document {
                None => WriteCondition::IfAbsent,
                Some(VersionedDocument {
                    version: Some(version),
                    ..
                }) => WriteCondition::IfVersion(version.clone()),
                Some(_) => {
                    debug!(
                        collection,
                        backend = self.store.backend_name(),
                        "backend does not version documents; writing unconditionally"
                    );
                    WriteCondition::Always
                }
            };

            let mut patch = Map::new();
            patch.insert(name.to_string(), fragment_patch);

            match self.store.merge_document(collection, patch, condition).await {
                Ok(()) => {
                    info!(collection, name, attempt, "stored entity");
                    return Ok(outcome);
                }
                Err(StoreError::Conflict(_)) if attempt < attempts => {
                    let delay = self.config.backoff(attempt);
                    warn!(collection, name, attempt, ?delay, "concurrent write detected; retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(StoreError::Conflict(_)) => break,
                Err(e) => return Err(e.into()),
            }
        }

        warn!(collection, name, attempts, "giving up after repeated write conflicts");
        Err(SyncError::ConflictRetriesExhausted {
            collection: collection.to_string(),
            attempts,
        })
    }
}
