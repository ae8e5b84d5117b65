//! # rowsync Protocol
//!
//! Wire messages and the record data model for the rowsync relay.
//!
//! This crate defines:
//! - [`Record`] - an ephemeral row with a client-assigned identifier
//! - [`PersistedDocument`] - a row committed to the remote document store,
//!   addressed by a store-assigned identifier
//! - [`ClientRequest`] - inbound WebSocket messages, tagged by `kind`
//! - [`ServerEvent`] - outbound frames carrying full collection state
//!
//! # Identifier spaces
//!
//! [`RecordId`] (client-assigned) and [`DocId`] (store-assigned) are
//! distinct types with no conversion between them. Saving a record writes
//! its fields to the remote store under a fresh [`DocId`]; the ephemeral
//! identity does not survive persistence.
//!
//! # Wire format
//!
//! All frames are JSON text. Inbound frames carry a `kind` tag:
//!
//! ```json
//! {"kind":"update","id":"a","data":{"desc":"y"}}
//! ```
//!
//! Outbound frames carry an `event` name derived from the collection:
//!
//! ```json
//! {"event":"update_mesas","records":[{"id":"a","desc":"y"}]}
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod messages;
mod record;

pub use error::{ProtocolError, ProtocolResult};
pub use messages::{ClientRequest, ServerEvent};
pub use record::{DocId, Fields, PersistedDocument, Record, RecordId};
