//! The ephemeral collection store.

use crate::error::{StoreError, StoreResult};
use parking_lot::RwLock;
use rowsync_protocol::{Fields, Record, RecordId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A collection name that passed the allow-list check.
///
/// Minted by [`EphemeralStore::resolve`]; holding one lets a connection
/// handler validate the name once at upgrade time instead of on every
/// frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Collection(Arc<str>);

impl Collection {
    /// Returns the collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-wide ephemeral store: one insertion-ordered record sequence per
/// allow-listed collection.
///
/// The allow-list is fixed at construction; any other name fails with
/// [`StoreError::InvalidCollection`].
///
/// # Duplicate ids
///
/// Identifiers are client-assigned and *not* checked for uniqueness.
/// If a sequence holds two records with the same id, `merge` and `remove`
/// apply to both. Keeping ids unique is the client's responsibility.
pub struct EphemeralStore {
    collections: HashMap<Arc<str>, RwLock<Vec<Record>>>,
}

impl EphemeralStore {
    /// Creates a store with the given collection allow-list.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let collections = names
            .into_iter()
            .map(|name| (Arc::from(name.into().as_str()), RwLock::new(Vec::new())))
            .collect();
        Self { collections }
    }

    /// Returns the allow-listed collection names.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(|name| name.as_ref())
    }

    /// Returns true if the name is in the allow-list.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Checks a name against the allow-list, returning a validated handle.
    pub fn resolve(&self, name: &str) -> StoreResult<Collection> {
        self.collections
            .get_key_value(name)
            .map(|(key, _)| Collection(Arc::clone(key)))
            .ok_or_else(|| StoreError::InvalidCollection(name.to_string()))
    }

    fn sequence(&self, name: &str) -> StoreResult<&RwLock<Vec<Record>>> {
        self.collections
            .get(name)
            .ok_or_else(|| StoreError::InvalidCollection(name.to_string()))
    }

    /// Returns a snapshot of the collection's current sequence.
    pub fn list(&self, collection: &str) -> StoreResult<Vec<Record>> {
        Ok(self.sequence(collection)?.read().clone())
    }

    /// Appends a record to the end of the sequence, unconditionally.
    ///
    /// No uniqueness check is made against existing ids. Returns the
    /// post-append snapshot.
    pub fn append(&self, collection: &str, record: Record) -> StoreResult<Vec<Record>> {
        let sequence = self.sequence(collection)?;
        let mut records = sequence.write();
        records.push(record);
        Ok(records.clone())
    }

    /// Shallow-merges `partial` into every record whose id matches.
    ///
    /// Records with other ids are unchanged. If nothing matches, the
    /// sequence is unchanged and no error is raised. Returns the
    /// post-merge snapshot.
    pub fn merge(
        &self,
        collection: &str,
        id: &RecordId,
        partial: &Fields,
    ) -> StoreResult<Vec<Record>> {
        let sequence = self.sequence(collection)?;
        let mut records = sequence.write();
        for record in records.iter_mut() {
            if record.id == *id {
                record.merge(partial);
            }
        }
        Ok(records.clone())
    }

    /// Drops every record whose id matches.
    ///
    /// Silent no-op if nothing matches. Returns the post-removal snapshot.
    pub fn remove(&self, collection: &str, id: &RecordId) -> StoreResult<Vec<Record>> {
        let sequence = self.sequence(collection)?;
        let mut records = sequence.write();
        records.retain(|record| record.id != *id);
        Ok(records.clone())
    }
}

impl fmt::Debug for EphemeralStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralStore")
            .field("collections", &self.collections.keys().collect::<Vec<_>>())
            .finish()
    }
}
