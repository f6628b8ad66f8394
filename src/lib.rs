//! Mock-capable HTTP API server library.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mock;
pub mod observability;
pub mod routing;

pub use config::MockServerConfig;
pub use http::{ApiError, ApiRequest, ApiResponse, HttpServer};
pub use lifecycle::Shutdown;
pub use mock::{MockResponder, MockStore};
pub use routing::{handler_fn, RequestHandler, Router};
