//! Mock fallback subsystem.
//!
//! # Data Flow
//! ```text
//! Unmatched request (path relative to the mount prefix)
//!     → responder.rs (classify shape: collection, item, other)
//!     → store.rs (list / get / create / replace / merge / delete)
//!     → ApiResponse (200 / 201 / 204) or ApiError (400 / 404)
//! ```
//!
//! # Design Decisions
//! - The store is owned by the server context, never global
//! - One lock per collection; collections never block each other

pub mod responder;
pub mod store;

pub use responder::MockResponder;
pub use store::{CollectionSummary, MockStore, RecordId};
