//! Wire messages exchanged over a collection channel.

use crate::error::{ProtocolError, ProtocolResult};
use crate::record::{DocId, Fields, PersistedDocument, Record, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// An inbound message from a client, tagged by `kind`.
///
/// Each channel is bound to a single collection, so requests name records,
/// never collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientRequest {
    /// Request the current ephemeral sequence. Replied to the requester
    /// only; no broadcast.
    Get,
    /// Append a record to the ephemeral sequence.
    New {
        /// The record to append, id included.
        record: Record,
    },
    /// Shallow-merge fields into every record with the given id.
    Update {
        /// Target ephemeral id.
        id: RecordId,
        /// Partial fields to merge.
        data: Fields,
    },
    /// Remove every record with the given id.
    Delete {
        /// Target ephemeral id.
        id: RecordId,
    },
    /// Persist the record to the remote store, then remove it from the
    /// ephemeral sequence.
    Save {
        /// Target ephemeral id.
        id: RecordId,
        /// The fields to persist.
        data: Fields,
    },
    /// Request the persisted document set. Replied to the requester only.
    GetPersisted,
    /// Delete a persisted document by its store-assigned id.
    DeletePersisted {
        /// Store-assigned id of the document to delete.
        id: DocId,
    },
}

impl ClientRequest {
    /// Decodes a request from a JSON text frame.
    pub fn decode(text: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encodes the request to a JSON text frame.
    pub fn encode(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An outbound frame from the gateway.
///
/// State frames always carry the *complete* current sequence of the
/// collection; clients replace their local view rather than patch it.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Full ephemeral sequence of a collection.
    EphemeralState {
        /// Collection the state belongs to.
        collection: String,
        /// The complete sequence, in insertion order.
        records: Vec<Record>,
    },
    /// Full persisted document set of a collection.
    PersistedState {
        /// Collection the documents belong to.
        collection: String,
        /// All documents currently in the remote store.
        documents: Vec<PersistedDocument>,
    },
    /// The gateway could not act on an inbound frame.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

const PERSISTED_PREFIX: &str = "update_persisted_";
const EPHEMERAL_PREFIX: &str = "update_";

impl ServerEvent {
    /// Creates an ephemeral state event.
    pub fn ephemeral(collection: impl Into<String>, records: Vec<Record>) -> Self {
        Self::EphemeralState {
            collection: collection.into(),
            records,
        }
    }

    /// Creates a persisted state event.
    pub fn persisted(collection: impl Into<String>, documents: Vec<PersistedDocument>) -> Self {
        Self::PersistedState {
            collection: collection.into(),
            documents,
        }
    }

    /// Creates an error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns the wire event name, e.g. `update_mesas`.
    #[must_use]
    pub fn event_name(&self) -> String {
        match self {
            Self::EphemeralState { collection, .. } => format!("{EPHEMERAL_PREFIX}{collection}"),
            Self::PersistedState { collection, .. } => format!("{PERSISTED_PREFIX}{collection}"),
            Self::Error { .. } => "error".to_string(),
        }
    }

    /// Encodes the event to a JSON text frame.
    pub fn encode(&self) -> ProtocolResult<String> {
        let value = match self {
            Self::EphemeralState { records, .. } => json!({
                "event": self.event_name(),
                "records": records,
            }),
            Self::PersistedState { documents, .. } => json!({
                "event": self.event_name(),
                "documents": documents,
            }),
            Self::Error { message } => json!({
                "event": "error",
                "message": message,
            }),
        };
        Ok(serde_json::to_string(&value)?)
    }

    /// Decodes an event from a JSON text frame.
    pub fn decode(text: &str) -> ProtocolResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let event = value
            .get("event")
            .and_then(|e| e.as_str())
            .ok_or_else(|| ProtocolError::InvalidPayload("missing event name".into()))?;

        if event == "error" {
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string();
            return Ok(Self::Error { message });
        }

        // The persisted prefix must be tried first: `update_` is a prefix
        // of `update_persisted_`.
        if let Some(collection) = event.strip_prefix(PERSISTED_PREFIX) {
            let documents = value
                .get("documents")
                .cloned()
                .ok_or_else(|| ProtocolError::InvalidPayload("missing documents".into()))?;
            return Ok(Self::PersistedState {
                collection: collection.to_string(),
                documents: serde_json::from_value(documents)?,
            });
        }

        if let Some(collection) = event.strip_prefix(EPHEMERAL_PREFIX) {
            let records = value
                .get("records")
                .cloned()
                .ok_or_else(|| ProtocolError::InvalidPayload("missing records".into()))?;
            return Ok(Self::EphemeralState {
                collection: collection.to_string(),
                records: serde_json::from_value(records)?,
            });
        }

        Err(ProtocolError::UnknownEvent(event.to_string()))
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

    #[test]
    fn request_kinds_decode() {
        let get = ClientRequest::decode(r#"{"kind":"get"}"#).unwrap();
        assert_eq!(get, ClientRequest::Get);

        let update =
            ClientRequest::decode(r#"{"kind":"update","id":"a","data":{"desc":"y"}}"#).unwrap();
        assert_eq!(
            update,
            ClientRequest::Update {
                id: RecordId::new("a"),
                data: fields(json!({"desc": "y"})),
            }
        );

        let delete = ClientRequest::decode(r#"{"kind":"delete","id":"a"}"#).unwrap();
        assert_eq!(
            delete,
            ClientRequest::Delete {
                id: RecordId::new("a")
            }
        );
    }

    #[test]
    fn new_request_carries_full_record() {
        let request =
            ClientRequest::decode(r#"{"kind":"new","record":{"id":"a","desc":"x"}}"#).unwrap();
        let ClientRequest::New { record } = request else {
            panic!("expected new request");
        };
        assert_eq!(record.id, RecordId::new("a"));
        assert_eq!(record.field("desc"), Some(&json!("x")));
    }

    #[test]
    fn request_roundtrip() {
        let request = ClientRequest::Save {
            id: RecordId::new("a"),
            data: fields(json!({"desc": "y"})),
        };
        let decoded = ClientRequest::decode(&request.encode().unwrap()).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn malformed_frame_is_an_error() {
        assert!(ClientRequest::decode("not json").is_err());
        assert!(ClientRequest::decode(r#"{"kind":"teleport"}"#).is_err());
    }

    #[test]
    fn ephemeral_event_wire_shape() {
        let event = ServerEvent::ephemeral("mesas", vec![Record::new("a", fields(json!({"desc": "x"})))]);
        let encoded: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();
        assert_eq!(
            encoded,
            json!({"event": "update_mesas", "records": [{"id": "a", "desc": "x"}]})
        );
    }

    #[test]
    fn persisted_event_wire_shape() {
        let event = ServerEvent::persisted(
            "mesas",
            vec![PersistedDocument::new("store-1", fields(json!({"desc": "y"})))],
        );
        let encoded: serde_json::Value = serde_json::from_str(&event.encode().unwrap()).unwrap();
        assert_eq!(
            encoded,
            json!({"event": "update_persisted_mesas", "documents": [{"id": "store-1", "desc": "y"}]})
        );
    }

    #[test]
    fn persisted_prefix_wins_over_ephemeral_prefix() {
        // `update_persisted_mesas` must not decode as an ephemeral update
        // of a collection named `persisted_mesas`.
        let text = r#"{"event":"update_persisted_mesas","documents":[]}"#;
        let event = ServerEvent::decode(text).unwrap();
        assert_eq!(
            event,
            ServerEvent::PersistedState {
                collection: "mesas".to_string(),
                documents: vec![],
            }
        );
    }

    #[test]
    fn event_roundtrip() {
        let event = ServerEvent::ephemeral("mesas", vec![Record::new("a", Fields::new())]);
        let decoded = ServerEvent::decode(&event.encode().unwrap()).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn unknown_event_is_an_error() {
        let result = ServerEvent::decode(r#"{"event":"celebrate","records":[]}"#);
        assert!(matches!(result, Err(ProtocolError::UnknownEvent(_))));
    }
}
