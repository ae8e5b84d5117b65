//! # rowsync Gateway
//!
//! The server side of the rowsync relay. Bridges duplex WebSocket clients
//! to the ephemeral store and rebroadcasts the resulting full state to
//! every connected client after each mutation; also exposes REST
//! passthrough endpoints for the remote document store.
//!
//! # Surfaces
//!
//! - `GET /ws/{collection}` - WebSocket channel for one collection
//! - `GET /api/{collection}` - list persisted documents
//! - `POST /api/{collection}` - add a persisted document
//! - `DELETE /api/{collection}/{id}` - delete a persisted document
//! - `GET /healthcheck` - liveness probe
//!
//! # Connection lifecycle
//!
//! Nothing is pushed on connect; a client asks for state with a `get`
//! frame. On disconnect there is nothing to clean up beyond the feed
//! subscription, which ends when the connection task drops its receiver.

#![deny(unsafe_code)]
#![warn(missing_docs)]
// Production code MUST NOT use panic!/unwrap()/expect()
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod http;
mod server;
mod state;
mod ws;

pub use config::{FirestoreConfig, ServerConfig};
pub use error::{GatewayError, GatewayResult};
pub use http::create_app;
pub use server::Server;
pub use state::AppState;
