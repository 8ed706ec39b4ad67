//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay + http layers produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Request ID is attached as a span field by the HTTP layer
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
