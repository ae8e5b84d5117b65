//! Gateway configuration.
//!
//! Sources, later ones winning: built-in defaults, a TOML file, then
//! environment variables (`ROWSYNC_PORT`, `ROWSYNC_SERVICE_ACCOUNT`,
//! `ROWSYNC_ACCESS_TOKEN`). The binary applies CLI flags on top.

use crate::error::{GatewayError, GatewayResult};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3001))
}

fn default_collections() -> Vec<String> {
    vec!["registros".to_string()]
}

/// Configuration for the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Collection allow-list; one ephemeral sequence and one WebSocket
    /// channel exist per entry.
    #[serde(default = "default_collections")]
    pub collections: Vec<String>,
    /// Remote document store credentials. When absent the gateway runs
    /// with an in-memory document store.
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
}

/// Credentials for the Firestore document store.
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreConfig {
    /// Path to the service-account credential blob.
    #[serde(default)]
    pub service_account_path: Option<PathBuf>,
    /// The credential blob itself, inline.
    #[serde(default)]
    pub service_account_json: Option<String>,
    /// Bearer token for the REST API, minted out of band.
    #[serde(default)]
    pub access_token: String,
}

impl FirestoreConfig {
    /// Returns the credential blob, reading the file if necessary.
    ///
    /// Inline JSON wins over the path so an environment override beats a
    /// config file.
    pub fn credential_blob(&self) -> GatewayResult<String> {
        if let Some(json) = &self.service_account_json {
            return Ok(json.clone());
        }
        if let Some(path) = &self.service_account_path {
            return Ok(std::fs::read_to_string(path)?);
        }
        Err(GatewayError::Config(
            "firestore needs service_account_path or service_account_json".into(),
        ))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            collections: default_collections(),
            firestore: None,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> GatewayResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Applies environment variable overrides.
    pub fn apply_env(&mut self) -> GatewayResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) -> GatewayResult<()> {
        if let Some(port) = get("ROWSYNC_PORT") {
            let port: u16 = port
                .parse()
                .map_err(|_| GatewayError::Config(format!("bad ROWSYNC_PORT: {port}")))?;
            self.bind_addr.set_port(port);
        }

        let service_account = get("ROWSYNC_SERVICE_ACCOUNT");
        let access_token = get("ROWSYNC_ACCESS_TOKEN");
        if service_account.is_some() || access_token.is_some() {
            let firestore = self.firestore.get_or_insert_with(|| FirestoreConfig {
                service_account_path: None,
                service_account_json: None,
                access_token: String::new(),
            });
            if let Some(blob) = service_account {
                firestore.service_account_json = Some(blob);
            }
            if let Some(token) = access_token {
                firestore.access_token = token;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_original_deployment() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3001);
        assert_eq!(config.collections, ["registros"]);
        assert!(config.firestore.is_none());
    }

    #[test]
    fn from_file_parses_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            bind_addr = "0.0.0.0:9000"
            collections = ["registros", "mesas"]

            [firestore]
            service_account_path = "/etc/rowsync/account.json"
            access_token = "tok"
            "#
        )
        .unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.collections, ["registros", "mesas"]);
        let firestore = config.firestore.unwrap();
        assert_eq!(
            firestore.service_account_path.as_deref(),
            Some(Path::new("/etc/rowsync/account.json"))
        );
        assert_eq!(firestore.access_token, "tok");
    }

    #[test]
    fn env_overrides_port_and_credentials() {
        let mut config = ServerConfig::default();
        config
            .apply_env_from(|key| match key {
                "ROWSYNC_PORT" => Some("4000".to_string()),
                "ROWSYNC_SERVICE_ACCOUNT" => Some(r#"{"project_id":"p"}"#.to_string()),
                "ROWSYNC_ACCESS_TOKEN" => Some("tok".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.bind_addr.port(), 4000);
        let firestore = config.firestore.unwrap();
        assert_eq!(
            firestore.service_account_json.as_deref(),
            Some(r#"{"project_id":"p"}"#)
        );
        assert_eq!(firestore.access_token, "tok");
    }

    #[test]
    fn bad_port_is_a_config_error() {
        let mut config = ServerConfig::default();
        let result = config.apply_env_from(|key| match key {
            "ROWSYNC_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn inline_credentials_win_over_path() {
        let firestore = FirestoreConfig {
            service_account_path: Some(PathBuf::from("/nonexistent")),
            service_account_json: Some(r#"{"project_id":"p"}"#.to_string()),
            access_token: "tok".to_string(),
        };
        assert_eq!(firestore.credential_blob().unwrap(), r#"{"project_id":"p"}"#);
    }

    #[test]
    fn missing_credentials_are_a_config_error() {
        let firestore = FirestoreConfig {
            service_account_path: None,
            service_account_json: None,
            access_token: String::new(),
        };
        assert!(matches!(
            firestore.credential_blob(),
            Err(GatewayError::Config(_))
        ));
    }
}
