//! WebSocket channel handler.
//!
//! Each connection is bound to one allow-listed collection. Inbound
//! frames are [`ClientRequest`]s; replies that concern only the requester
//! (`get`, `get_persisted`) go straight back on the socket, while
//! mutations publish the full post-mutation state to the update feed,
//! which every connection on the channel (the originator included)
//! forwards to its client.
//!
//! Failures on the `save` and persisted paths are logged and swallowed:
//! the client receives no error signal and the ephemeral sequence is left
//! untouched.

use crate::error::GatewayError;
use crate::state::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use rowsync_docstore::DocumentStore as _;
use rowsync_protocol::{ClientRequest, ServerEvent};
use rowsync_store::{Collection, StateUpdate, StoreResult};

pub(crate) async fn handle_ws(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    // Validate before upgrading so a bad name earns a plain 400 instead
    // of an accepted-then-dropped socket.
    let collection = match state.store.resolve(&collection) {
        Ok(collection) => collection,
        Err(err) => return GatewayError::from(err).into_response(),
    };
    ws.on_upgrade(move |socket| connection(socket, state, collection))
}

async fn connection(mut socket: WebSocket, state: AppState, collection: Collection) {
    let mut updates = state.feed.subscribe(collection.name());
    tracing::debug!(collection = %collection, "client connected");

    loop {
        tokio::select! {
            biased;

            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                let text = match msg {
                    Message::Text(text) => text,
                    Message::Close(_) => break,
                    _ => continue,
                };

                let reply = match ClientRequest::decode(&text) {
                    Ok(request) => dispatch(&state, &collection, request).await,
                    Err(err) => {
                        tracing::debug!(collection = %collection, %err, "malformed frame");
                        Some(ServerEvent::error(format!("malformed frame: {err}")))
                    }
                };
                if let Some(event) = reply {
                    if send_event(&mut socket, &event).await.is_err() {
                        break;
                    }
                }
            }

            update = updates.recv() => {
                let Some(update) = update else { break };
                if send_event(&mut socket, &event_for(update)).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!(collection = %collection, "client disconnected");
}

/// Applies one request. Returns the direct reply for requester-only
/// kinds; broadcast kinds go through the feed and return `None`.
async fn dispatch(
    state: &AppState,
    collection: &Collection,
    request: ClientRequest,
) -> Option<ServerEvent> {
    let name = collection.name();
    match request {
        ClientRequest::Get => match state.store.list(name) {
            Ok(records) => Some(ServerEvent::ephemeral(name, records)),
            Err(err) => {
                tracing::warn!(collection = name, %err, "get failed");
                None
            }
        },

        ClientRequest::New { record } => {
            publish_ephemeral(state, name, state.store.append(name, record));
            None
        }

        ClientRequest::Update { id, data } => {
            publish_ephemeral(state, name, state.store.merge(name, &id, &data));
            None
        }

        ClientRequest::Delete { id } => {
            publish_ephemeral(state, name, state.store.remove(name, &id));
            None
        }

        ClientRequest::Save { id, data } => {
            match state.docstore.add(name, &data).await {
                Ok(document) => {
                    tracing::debug!(collection = name, ephemeral_id = %id, doc_id = %document.doc_id, "record saved");
                    publish_ephemeral(state, name, state.store.remove(name, &id));
                }
                Err(err) => {
                    // fire-and-forget: the record stays ephemeral and the
                    // client hears nothing
                    tracing::warn!(collection = name, ephemeral_id = %id, %err, "save failed");
                }
            }
            None
        }

        ClientRequest::GetPersisted => match state.docstore.list(name).await {
            Ok(documents) => Some(ServerEvent::persisted(name, documents)),
            Err(err) => {
                tracing::warn!(collection = name, %err, "persisted list failed");
                None
            }
        },

        ClientRequest::DeletePersisted { id } => {
            match state.docstore.delete(name, &id).await {
                Ok(()) => match state.docstore.list(name).await {
                    Ok(documents) => state.feed.publish(StateUpdate::Persisted {
                        collection: name.to_string(),
                        documents,
                    }),
                    Err(err) => {
                        tracing::warn!(collection = name, %err, "refresh after delete failed");
                    }
                },
                Err(err) => {
                    tracing::warn!(collection = name, doc_id = %id, %err, "persisted delete failed");
                }
            }
            None
        }
    }
}

fn publish_ephemeral(state: &AppState, collection: &str, result: StoreResult<Vec<rowsync_protocol::Record>>) {
    match result {
        Ok(records) => state.feed.publish(StateUpdate::Ephemeral {
            collection: collection.to_string(),
            records,
        }),
        // unreachable with a resolved collection, but the store is honest
        // about the fallibility of its API
        Err(err) => tracing::warn!(collection, %err, "mutation failed"),
    }
}

fn event_for(update: StateUpdate) -> ServerEvent {
    match update {
        StateUpdate::Ephemeral {
            collection,
            records,
        } => ServerEvent::ephemeral(collection, records),
        StateUpdate::Persisted {
            collection,
            documents,
        } => ServerEvent::persisted(collection, documents),
    }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    match event.encode() {
        Ok(text) => socket.send(Message::Text(text.into())).await,
        Err(err) => {
            tracing::warn!(%err, "could not encode event");
            Ok(())
        }
    }
}
