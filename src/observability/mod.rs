//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or the configured level)
//!     → Metrics endpoint (Prometheus scrape, only when configured)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the HTTP layers into every request span
//! - Metric updates are cheap and safe to call without an installed recorder

pub mod logging;
pub mod metrics;
