//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (walk routes and mounts in registration order)
//!     → matcher.rs (segment match, parameter capture, specificity)
//!     → Return: RouteMatch (handler, params, relative path) or NoMatch
//!
//! Route Registration (at startup):
//!     register / register_any / mount
//!     → Parse pattern, reject duplicates
//!     → Freeze as immutable Router behind Arc
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - Most specific wins; first registered breaks ties

use std::collections::HashMap;

pub mod matcher;
pub mod router;
pub mod static_response;

pub use matcher::PathPattern;
pub use router::{
    handler_fn, ConflictPolicy, HandlerFn, RequestHandler, RouteError, RouteMatch, Router,
};
pub use static_response::StaticResponse;

/// Path parameters captured by a route pattern, keyed by name.
pub type PathParams = HashMap<String, String>;
