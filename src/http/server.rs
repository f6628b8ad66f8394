//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the root router: admin endpoints plus the mounted application
//! - Attach the mock fallback when enabled
//! - Wire up middleware (request ID, tracing, panics, timeout, body limit)
//! - Buffer request bodies and dispatch to the routing engine
//! - Serve until the shutdown signal fires

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::Span;

use crate::admin::register_admin_routes;
use crate::config::MockServerConfig;
use crate::http::{ApiError, ApiRequest, X_REQUEST_ID};
use crate::mock::{MockResponder, MockStore};
use crate::observability::metrics;
use crate::routing::static_response::register_routes;
use crate::routing::{RequestHandler, RouteError, Router};

/// Per-server state shared with every request.
///
/// Owns the root router and the mock store; nothing here is global, so
/// several servers can run side by side.
pub struct ServerContext {
    router: Router,
    store: Arc<MockStore>,
    max_body_bytes: usize,
}

impl ServerContext {
    pub fn new(router: Router, store: Arc<MockStore>, max_body_bytes: usize) -> Self {
        Self {
            router,
            store,
            max_body_bytes,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn store(&self) -> &Arc<MockStore> {
        &self.store
    }

    /// Route a buffered request and render the outcome.
    pub fn dispatch(&self, request: &ApiRequest) -> Response {
        match self.router.handle(request) {
            Ok(response) => response.into_response(),
            Err(err) => {
                tracing::debug!(
                    method = %request.method(),
                    path = %request.path(),
                    error = %err,
                    "Request rejected"
                );
                err.into_response()
            }
        }
    }
}

/// HTTP server for the mock API.
pub struct HttpServer {
    app: axum::Router,
    context: Arc<ServerContext>,
    config: MockServerConfig,
}

impl HttpServer {
    /// Create a server whose explicit routes come from the configuration only.
    pub fn new(config: MockServerConfig) -> Result<Self, RouteError> {
        Self::with_routes(config, Router::new())
    }

    /// Create a server with programmatic explicit routes.
    ///
    /// Configured `[[routes]]` are added to `routes`, the mock fallback is
    /// attached when enabled, and the result is mounted under the prefix.
    pub fn with_routes(config: MockServerConfig, mut routes: Router) -> Result<Self, RouteError> {
        let store = Arc::new(MockStore::new(config.mock.id_strategy));

        register_routes(&mut routes, &config.routes)?;
        if config.mock.enabled {
            let responder = MockResponder::new(Arc::clone(&store), config.mock.persist);
            routes.set_fallback(Arc::new(responder));
        }

        let mut root = Router::new();
        if config.admin.enabled {
            register_admin_routes(&mut root, Arc::clone(&store), &config.mock)?;
        }
        root.mount(&config.server.mount_prefix, routes)?;

        let context = Arc::new(ServerContext::new(
            root,
            store,
            config.limits.max_body_bytes,
        ));
        let app = Self::build_router(&config, Arc::clone(&context));

        Ok(Self {
            app,
            context,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers are listed innermost first: the body limit sits closest to the
    /// handler, the request id is assigned before anything else runs.
    #[allow(deprecated)]
    fn build_router(config: &MockServerConfig, context: Arc<ServerContext>) -> axum::Router {
        axum::Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(context)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.limits.request_timeout_secs,
            )))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The Axum application, for serving or for driving in tests.
    pub fn router(&self) -> axum::Router {
        self.app.clone()
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.context
    }

    pub fn store(&self) -> Arc<MockStore> {
        Arc::clone(self.context.store())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &MockServerConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires (or its sender is dropped).
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_prefix = %self.config.server.mount_prefix,
            mock_enabled = self.config.mock.enabled,
            persist = self.config.mock.persist,
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Buffer the body, then hand the request to the routing engine.
async fn dispatch_handler(
    State(context): State<Arc<ServerContext>>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let method = parts.method.to_string();

    let response = match axum::body::to_bytes(body, context.max_body_bytes).await {
        Ok(bytes) => context.dispatch(&ApiRequest::from_parts(&parts, bytes)),
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Failed to read request body");
            ApiError::PayloadTooLarge.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
