//! Shared state handed to every handler.

use rowsync_docstore::DocumentStore;
use rowsync_store::{EphemeralStore, UpdateFeed};
use std::sync::Arc;

/// Everything a request or connection handler needs.
///
/// Cheap to clone; all parts are shared.
#[derive(Clone)]
pub struct AppState {
    /// The ephemeral collection store.
    pub store: Arc<EphemeralStore>,
    /// The remote document store.
    pub docstore: Arc<dyn DocumentStore>,
    /// Fan-out of full-state snapshots to connected clients.
    pub feed: Arc<UpdateFeed>,
}

impl AppState {
    /// Creates the shared state.
    pub fn new(
        store: Arc<EphemeralStore>,
        docstore: Arc<dyn DocumentStore>,
        feed: Arc<UpdateFeed>,
    ) -> Self {
        Self {
            store,
            docstore,
            feed,
        }
    }
}
