//! Gateway server lifecycle.

use crate::config::ServerConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::http::create_app;
use crate::state::AppState;
use rowsync_docstore::DocumentStore;
use rowsync_store::{EphemeralStore, UpdateFeed};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// A running gateway.
///
/// Owns the accept loop; dropping the handle does not stop the server,
/// use [`Server::shutdown`] or let [`Server::run_until_done`] finish.
pub struct Server {
    addr: SocketAddr,
    task: JoinHandle<std::io::Result<()>>,
}

impl Server {
    /// Binds the listener and spawns the server.
    ///
    /// The ephemeral store is built fresh from the configured allow-list;
    /// the document store is injected so tests and credential-less runs
    /// can substitute the in-memory one.
    pub async fn spawn(
        config: ServerConfig,
        docstore: Arc<dyn DocumentStore>,
    ) -> GatewayResult<Self> {
        let store = Arc::new(EphemeralStore::new(config.collections.clone()));
        let feed = Arc::new(UpdateFeed::new());
        let state = AppState::new(store, docstore, feed);

        let app = create_app(state);
        let listener = TcpListener::bind(config.bind_addr).await?;
        let addr = listener.local_addr()?;
        info!("gateway listening on http://{addr}");

        let task = tokio::spawn(axum::serve(listener, app).into_future());
        Ok(Self { addr, task })
    }

    /// Returns the bound address.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs until the accept loop exits.
    pub async fn run_until_done(self) -> GatewayResult<()> {
        match self.task.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(GatewayError::Io(err)),
            Err(err) if err.is_cancelled() => Ok(()),
            Err(err) => Err(GatewayError::Internal(err.to_string())),
        }
    }

    /// Stops the server.
    pub fn shutdown(self) {
        self.task.abort();
    }
}
