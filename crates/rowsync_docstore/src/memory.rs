//! In-memory document store for testing.

use crate::error::DocStoreResult;
use crate::store::DocumentStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use rowsync_protocol::{DocId, Fields, PersistedDocument};
use std::collections::HashMap;
use uuid::Uuid;

/// An in-memory document store.
///
/// Mirrors the remote store's observable behavior: ids are assigned on
/// `add`, listing an unknown collection yields an empty set, and deleting
/// an absent id succeeds silently. Suitable for unit tests, integration
/// tests, and credential-less development runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<PersistedDocument>>>,
}

impl MemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Returns true if the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> DocStoreResult<Vec<PersistedDocument>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, collection: &str, fields: &Fields) -> DocStoreResult<PersistedDocument> {
        let document = PersistedDocument::new(Uuid::new_v4().to_string(), fields.clone());
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn delete(&self, collection: &str, id: &DocId) -> DocStoreResult<()> {
        if let Some(documents) = self.collections.write().get_mut(collection) {
            documents.retain(|doc| doc.doc_id != *id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn add_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let first = store.add("registros", &fields(json!({"n": 1}))).await.unwrap();
        let second = store.add("registros", &fields(json!({"n": 2}))).await.unwrap();
        assert_ne!(first.doc_id, second.doc_id);
    }

    #[tokio::test]
    async fn list_returns_documents_in_insertion_order() {
        let store = MemoryStore::new();
        store.add("registros", &fields(json!({"n": 1}))).await.unwrap();
        store.add("registros", &fields(json!({"n": 2}))).await.unwrap();

        let documents = store.list("registros").await.unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].fields.get("n"), Some(&json!(1)));
        assert_eq!(documents[1].fields.get("n"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn list_of_unknown_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.list("nada").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_the_document() {
        let store = MemoryStore::new();
        let doc = store.add("registros", &Fields::new()).await.unwrap();
        store.delete("registros", &doc.doc_id).await.unwrap();
        assert!(store.list("registros").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_of_absent_id_succeeds() {
        let store = MemoryStore::new();
        store.add("registros", &Fields::new()).await.unwrap();
        store
            .delete("registros", &DocId::new("ghost"))
            .await
            .unwrap();
        assert_eq!(store.len("registros"), 1);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryStore::new();
        let doc = store.add("registros", &Fields::new()).await.unwrap();
        store.add("mesas", &Fields::new()).await.unwrap();

        store.delete("registros", &doc.doc_id).await.unwrap();
        assert!(store.is_empty("registros"));
        assert_eq!(store.len("mesas"), 1);
    }
}
