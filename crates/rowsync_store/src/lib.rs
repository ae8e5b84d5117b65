//! # rowsync Store
//!
//! The ephemeral side of the rowsync relay: a process-wide mapping from
//! collection name to an insertion-ordered sequence of records, plus the
//! update feed that fans full-state snapshots out to connected clients.
//!
//! Nothing here survives a restart. Rows that should outlive the process
//! are written to the remote document store by the gateway's `save` path
//! and leave this store at that moment.
//!
//! ## Concurrency
//!
//! Each collection's sequence sits behind its own `parking_lot::RwLock`.
//! Every mutation is applied atomically with respect to other mutations on
//! the same collection, and each mutating method returns the post-mutation
//! snapshot taken under the same lock, so a broadcast built from the
//! return value reflects the store exactly as the mutation left it.
//!
//! ## Example
//!
//! ```rust
//! use rowsync_store::EphemeralStore;
//! use rowsync_protocol::{Fields, Record};
//!
//! let store = EphemeralStore::new(["mesas"]);
//! store.append("mesas", Record::new("a", Fields::new())).unwrap();
//! assert_eq!(store.list("mesas").unwrap().len(), 1);
//! assert!(store.list("sillas").is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod feed;
mod store;

pub use error::{StoreError, StoreResult};
pub use feed::{StateUpdate, UpdateFeed};
pub use store::{Collection, EphemeralStore};
