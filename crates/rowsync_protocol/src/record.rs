//! Record and document types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The free-form field map carried by records and documents.
///
/// Values are passed through untouched; the relay enforces no schema.
pub type Fields = serde_json::Map<String, Value>;

/// Client-assigned identifier of an ephemeral record.
///
/// The relay never generates these and never checks them for uniqueness.
/// If two records in a sequence share an id, every mutation addressed to
/// that id applies to both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned identifier of a persisted document.
///
/// Assigned by the remote document store on `add`. Deliberately not
/// convertible to or from [`RecordId`]: a record's identity changes when
/// it is persisted, and the two spaces are never reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Creates a document id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ephemeral record: a client-assigned id plus free-form fields.
///
/// Serialized flat, so `Record { id: "a", fields: {desc: "x"} }` is
/// `{"id":"a","desc":"x"}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Client-assigned identifier.
    pub id: RecordId,
    /// Everything else the client sent.
    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    /// Creates a record.
    pub fn new(id: impl Into<RecordId>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Shallow-merges `partial` into this record.
    ///
    /// Keys present in `partial` overwrite matching field keys; other
    /// fields are untouched. An `"id"` key with a string value replaces
    /// the record id itself, matching the object-spread semantics of the
    /// wire format.
    pub fn merge(&mut self, partial: &Fields) {
        for (key, value) in partial {
            if key == "id" {
                if let Value::String(id) = value {
                    self.id = RecordId::new(id.clone());
                }
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Returns a field value by key, if present.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// A document committed to the remote store.
///
/// Serialized flat like [`Record`], but the `id` here is the
/// store-assigned [`DocId`], not the ephemeral id the row had before it
/// was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDocument {
    /// Store-assigned identifier.
    #[serde(rename = "id")]
    pub doc_id: DocId,
    /// The document fields.
    #[serde(flatten)]
    pub fields: Fields,
}

impl PersistedDocument {
    /// Creates a persisted document.
    pub fn new(doc_id: impl Into<DocId>, fields: Fields) -> Self {
        Self {
            doc_id: doc_id.into(),
            fields,
        }
    }
}
