//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the server (routes, fallback, mount)
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, MockServerConfig};
use crate::http::HttpServer;
use crate::routing::RouteError;

/// Errors that stop the process before it serves traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("route registration failed: {0}")]
    Routes(#[from] RouteError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load the config file if one is given, otherwise use defaults.
pub fn load(path: Option<&Path>) -> Result<MockServerConfig, StartupError> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            tracing::debug!(path = %path.display(), "Configuration file loaded");
            Ok(config)
        }
        None => Ok(MockServerConfig::default()),
    }
}

/// Build the server and bind its listener.
pub async fn prepare(config: MockServerConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let address = config.server.socket_address();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    Ok((server, listener))
}
