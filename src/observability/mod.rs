//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!     → request IDs attached by the HTTP layer
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never formatted strings, for machine parsing
//! - Request ID flows from header to every request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
