//! Document store trait definition.

use crate::error::DocStoreResult;
use async_trait::async_trait;
use rowsync_protocol::{DocId, Fields, PersistedDocument};

/// A remote document database holding saved rows.
///
/// Implementations are **thin passthroughs**: one network call per method,
/// errors propagated as-is, no retries.
///
/// # Invariants
///
/// - `add` returns the created document carrying the store-assigned
///   [`DocId`]; the caller's ephemeral id plays no part in it
/// - `list` returns every document in the collection; an unknown or empty
///   collection yields an empty list, not an error
/// - `delete` of an id that does not exist succeeds silently
///
/// # Implementors
///
/// - [`crate::FirestoreStore`] - Firestore REST v1
/// - [`crate::MemoryStore`] - in-memory, for tests
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists all documents in the collection.
    async fn list(&self, collection: &str) -> DocStoreResult<Vec<PersistedDocument>>;

    /// Adds a document; the store assigns and returns its id.
    async fn add(&self, collection: &str, fields: &Fields) -> DocStoreResult<PersistedDocument>;

    /// Deletes a document by its store-assigned id.
    async fn delete(&self, collection: &str, id: &DocId) -> DocStoreResult<()>;
}
