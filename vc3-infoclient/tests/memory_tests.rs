use serde_json::{json, Map, Value};
use vc3_infoclient::{DocumentStore, MemoryDocumentStore, StoreError, WriteCondition};

fn patch(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn unknown_collection_is_not_found() {
    let store = MemoryDocumentStore::new();
    let err = store.get_document("user").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref c) if c == "user"));
}

#[tokio::test]
async fn merge_creates_collection_and_keeps_siblings() {
    let store = MemoryDocumentStore::new();
    store
        .merge_document("user", patch(json!({"alice": {"first": "Alice"}})), WriteCondition::Always)
        .await
        .unwrap();
    store
        .merge_document("user", patch(json!({"bob": {"first": "Bob"}})), WriteCondition::Always)
        .await
        .unwrap();

    let doc = store.get_document("user").await.unwrap();
    assert_eq!(doc.entries.len(), 2);
    assert_eq!(doc.entries["alice"]["first"], "Alice");
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn version_advances_on_every_write() {
    let store = MemoryDocumentStore::new();
    store
        .merge_document("user", patch(json!({"a": {}})), WriteCondition::IfAbsent)
        .await
        .unwrap();
    let v1 = store.get_document("user").await.unwrap().version.unwrap();

    store
        .merge_document("user", patch(json!({"b": {}})), WriteCondition::IfVersion(v1.clone()))
        .await
        .unwrap();
    let v2 = store.get_document("user").await.unwrap().version.unwrap();
    assert_ne!(v1, v2);
}

#[tokio::test]
async fn stale_version_conflicts_without_writing() {
    let store = MemoryDocumentStore::new();
    store
        .merge_document("user", patch(json!({"a": {"x": 1}})), WriteCondition::Always)
        .await
        .unwrap();
    let stale = store.get_document("user").await.unwrap().version.unwrap();
    store
        .merge_document("user", patch(json!({"a": {"x": 2}})), WriteCondition::Always)
        .await
        .unwrap();

    let err = store
        .merge_document("user", patch(json!({"a": {"x": 3}})), WriteCondition::IfVersion(stale))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(store.snapshot("user").await.unwrap()["a"]["x"], 2);
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn if_absent_conflicts_once_created() {
    let store = MemoryDocumentStore::new().with_document("user", json!({}));
    let err = store
        .merge_document("user", patch(json!({"a": {}})), WriteCondition::IfAbsent)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn null_in_patch_deletes_key() {
    let store = MemoryDocumentStore::new().with_document(
        "resource",
        json!({"r1": {"attributemap": {"a": 1, "b": 2}}}),
    );
    store
        .merge_document("resource", patch(json!({"r1": {"attributemap": {"a": null}}})), WriteCondition::Always)
        .await
        .unwrap();
    assert_eq!(
        store.snapshot("resource").await.unwrap(),
        json!({"r1": {"attributemap": {"b": 2}}})
    );
}

#[tokio::test]
async fn non_object_document_is_invalid() {
    let store = MemoryDocumentStore::new().with_document("user", json!(["not", "a", "map"]));
    let err = store.get_document("user").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidDocument { .. }));
}
