//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers, body buffering)
//!     → request.rs (ApiRequest: method, path, headers, body, params)
//!     → [routing layer picks explicit handler or mock fallback]
//!     → response.rs / error.rs (ApiResponse or ApiError → HTTP)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::{ApiRequest, X_REQUEST_ID};
pub use response::ApiResponse;
pub use server::{HttpServer, ServerContext};
