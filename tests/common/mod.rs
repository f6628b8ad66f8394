//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use mock_server::{HttpServer, MockServerConfig, MockStore, Router, Shutdown};
use tokio::net::TcpListener;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<MockStore>,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with default configuration.
#[allow(dead_code)]
pub async fn spawn_default() -> TestServer {
    spawn_server(MockServerConfig::default(), Router::new()).await
}

/// Start a server with the given configuration and explicit routes.
pub async fn spawn_server(config: MockServerConfig, routes: Router) -> TestServer {
    let server = HttpServer::with_routes(config, routes).unwrap();
    let store = server.store();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        store,
        shutdown,
    }
}
