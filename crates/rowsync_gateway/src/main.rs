//! rowsync gateway binary.
//!
//! Serves the WebSocket sync channels and the REST passthrough endpoints.
//! Configuration comes from an optional TOML file, environment variables
//! (`ROWSYNC_PORT`, `ROWSYNC_SERVICE_ACCOUNT`, `ROWSYNC_ACCESS_TOKEN`) and
//! CLI flags, in that order.

use clap::Parser;
use rowsync_docstore::{DocumentStore, FirestoreStore, MemoryStore, ServiceAccount};
use rowsync_gateway::{GatewayResult, Server, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Real-time row synchronization relay.
#[derive(Parser)]
#[command(name = "rowsync-gateway")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env()?;
    if let Some(port) = cli.port {
        config.bind_addr.set_port(port);
    }

    let docstore = build_docstore(&config)?;
    let server = Server::spawn(config, docstore).await?;
    server.run_until_done().await?;
    Ok(())
}

fn build_docstore(config: &ServerConfig) -> GatewayResult<Arc<dyn DocumentStore>> {
    match &config.firestore {
        Some(firestore) => {
            let blob = firestore.credential_blob()?;
            let account = ServiceAccount::from_json(&blob)?;
            tracing::info!(
                project = account.project_id,
                "using Firestore document store"
            );
            Ok(Arc::new(FirestoreStore::new(
                &account,
                firestore.access_token.clone(),
            )))
        }
        None => {
            tracing::warn!("no firestore credentials configured, saved rows will not survive restarts");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
