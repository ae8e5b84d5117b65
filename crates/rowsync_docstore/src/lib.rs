//! # rowsync Document Store
//!
//! Thin passthrough to the remote document database that holds saved rows.
//!
//! The [`DocumentStore`] trait covers exactly the three operations the
//! relay needs: list all documents in a collection, add a document (the
//! store assigns the id), and delete a document by its store-assigned id.
//! No retries, no partial-failure handling beyond propagating the error.
//!
//! ## Implementations
//!
//! - [`FirestoreStore`] - Firestore REST v1 over `reqwest`
//! - [`MemoryStore`] - in-memory, for tests and credential-less runs

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod firestore;
mod memory;
mod store;
mod value;

pub use error::{DocStoreError, DocStoreResult};
pub use firestore::{FirestoreStore, ServiceAccount};
pub use memory::MemoryStore;
pub use store::DocumentStore;
