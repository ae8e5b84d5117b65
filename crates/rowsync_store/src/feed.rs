//! Update feed: full-state fan-out to connected clients.
//!
//! The relay's contract is "mutate, then notify all subscribers": after
//! every mutating operation the gateway publishes the complete current
//! sequence of the affected collection, and every subscriber (one per
//! WebSocket connection on that collection's channel) receives its own
//! copy. Subscribers that went away are dropped lazily on the next
//! publish.

use parking_lot::RwLock;
use rowsync_protocol::{PersistedDocument, Record};
use std::collections::HashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A full-state snapshot pushed to subscribers after a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// The complete ephemeral sequence of a collection.
    Ephemeral {
        /// Collection the snapshot belongs to.
        collection: String,
        /// The full sequence, in insertion order.
        records: Vec<Record>,
    },
    /// The complete persisted document set of a collection.
    Persisted {
        /// Collection the snapshot belongs to.
        collection: String,
        /// All documents currently in the remote store.
        documents: Vec<PersistedDocument>,
    },
}

impl StateUpdate {
    /// Returns the collection this update belongs to.
    #[must_use]
    pub fn collection(&self) -> &str {
        match self {
            Self::Ephemeral { collection, .. } | Self::Persisted { collection, .. } => collection,
        }
    }
}

/// Fan-out of [`StateUpdate`]s to per-connection subscribers.
///
/// Keyed by collection name; a subscriber only sees updates for the
/// collection it subscribed to. Publish order is preserved per collection.
#[derive(Debug, Default)]
pub struct UpdateFeed {
    subscribers: RwLock<HashMap<String, Vec<UnboundedSender<StateUpdate>>>>,
}

impl UpdateFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to updates for one collection.
    ///
    /// The subscription ends when the returned receiver is dropped; the
    /// sender side is cleaned up on the next publish to that collection.
    pub fn subscribe(&self, collection: &str) -> UnboundedReceiver<StateUpdate> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .write()
            .entry(collection.to_string())
            .or_default()
            .push(tx);
        rx
    }

    /// Publishes an update to every subscriber of its collection.
    ///
    /// Each subscriber receives a clone. Subscribers whose receiver has
    /// been dropped are removed.
    pub fn publish(&self, update: StateUpdate) {
        let mut subscribers = self.subscribers.write();
        if let Some(senders) = subscribers.get_mut(update.collection()) {
            senders.retain(|tx| tx.send(update.clone()).is_ok());
            tracing::trace!(
                collection = update.collection(),
                subscribers = senders.len(),
                "published state update"
            );
        }
    }

    /// Returns the number of live subscribers for a collection.
    ///
    /// Counts are exact only after a publish, since dead subscribers are
    /// cleaned up lazily.
    #[must_use]
    pub fn subscriber_count(&self, collection: &str) -> usize {
        self.subscribers
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsync_protocol::Fields;

    fn update(collection: &str) -> StateUpdate {
        StateUpdate::Ephemeral {
            collection: collection.to_string(),
            records: vec![Record::new("a", Fields::new())],
        }
    }

    #[test]
    fn publish_reaches_every_subscriber() {
        let feed = UpdateFeed::new();
        let mut rx1 = feed.subscribe("mesas");
        let mut rx2 = feed.subscribe("mesas");

        feed.publish(update("mesas"));

        assert_eq!(rx1.try_recv().unwrap(), update("mesas"));
        assert_eq!(rx2.try_recv().unwrap(), update("mesas"));
    }

    #[test]
    fn updates_are_scoped_to_their_collection() {
        let feed = UpdateFeed::new();
        let mut mesas = feed.subscribe("mesas");
        let mut registros = feed.subscribe("registros");

        feed.publish(update("mesas"));

        assert!(mesas.try_recv().is_ok());
        assert!(registros.try_recv().is_err());
    }

    #[test]
    fn publish_order_is_preserved() {
        let feed = UpdateFeed::new();
        let mut rx = feed.subscribe("mesas");

        for n in 0..3 {
            feed.publish(StateUpdate::Ephemeral {
                collection: "mesas".to_string(),
                records: vec![Record::new(format!("r{n}"), Fields::new())],
            });
        }

        for n in 0..3 {
            let StateUpdate::Ephemeral { records, .. } = rx.try_recv().unwrap() else {
                panic!("expected ephemeral update");
            };
            assert_eq!(records[0].id.as_str(), format!("r{n}"));
        }
    }

    #[test]
    fn dropped_subscribers_are_cleaned_up_on_publish() {
        let feed = UpdateFeed::new();
        let rx = feed.subscribe("mesas");
        assert_eq!(feed.subscriber_count("mesas"), 1);

        drop(rx);
        feed.publish(update("mesas"));
        assert_eq!(feed.subscriber_count("mesas"), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_across_tasks() {
        let feed = std::sync::Arc::new(UpdateFeed::new());
        let mut rx = feed.subscribe("mesas");

        let publisher = std::sync::Arc::clone(&feed);
        tokio::spawn(async move {
            publisher.publish(update("mesas"));
        });

        let received = rx.recv().await.unwrap();
        assert_eq!(received.collection(), "mesas");
    }
}
