//! Mock API server.
//!
//! Serves explicit routes from configuration and answers everything else with
//! synthesized REST responses backed by an in-memory store.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                     MOCK SERVER                      │
//!                     │                                                      │
//!   Client Request    │  ┌──────────┐   ┌───────────┐   ┌────────────────┐   │
//!   ──────────────────┼─▶│  axum +  │──▶│   root    │──▶│ explicit route │   │
//!                     │  │  layers  │   │  router   │   │   handlers     │   │
//!                     │  └──────────┘   └─────┬─────┘   └────────────────┘   │
//!                     │                       │ no match                     │
//!                     │                       ▼                              │
//!                     │               ┌───────────────┐   ┌──────────────┐   │
//!                     │               │ mock responder│──▶│  mock store  │   │
//!                     │               └───────────────┘   └──────────────┘   │
//!                     │                                                      │
//!                     │   config · lifecycle · observability · admin         │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use mock_server::config::{validate_config, ConfigError, MockServerConfig};
use mock_server::lifecycle::{signals, startup, Shutdown};
use mock_server::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "mock-server")]
#[command(about = "HTTP API server that mocks every route it does not know", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Path prefix to serve the API under.
    #[arg(long)]
    prefix: Option<String>,

    /// Answer unmatched requests with 404 instead of mock responses.
    #[arg(long)]
    no_mock: bool,

    /// Acknowledge writes without storing them.
    #[arg(long)]
    no_persist: bool,
}

impl Cli {
    fn apply(&self, config: &mut MockServerConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(prefix) = &self.prefix {
            config.server.mount_prefix = prefix.clone();
        }
        if self.no_mock {
            config.mock.enabled = false;
        }
        if self.no_persist {
            config.mock.persist = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match startup::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mock-server: {}", e);
            return Err(e.into());
        }
    };
    cli.apply(&mut config);
    if let Err(errors) = validate_config(&config) {
        let e = ConfigError::Validation(errors);
        eprintln!("mock-server: {}", e);
        return Err(e.into());
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mock-server starting");
    tracing::info!(
        bind_address = %config.server.socket_address(),
        mount_prefix = %config.server.mount_prefix,
        mock_enabled = config.mock.enabled,
        persist = config.mock.persist,
        static_routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let (server, listener) = match startup::prepare(config).await {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    signals::forward_signals(Arc::clone(&shutdown));

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
