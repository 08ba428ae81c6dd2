//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! Heartbeat (pinger.rs):
//!     Periodic timer
//!     → GET {base}/{uuid}
//!
//! Failure report (pinger.rs):
//!     Delivery error observed by a request handler
//!     → POST {base}/{uuid}/fail with the error text
//! ```
//!
//! # Design Decisions
//! - Disabled entirely when no check id is configured
//! - Heartbeat problems are logged, never fatal
//! - The pinger stops on the shutdown broadcast

pub mod pinger;

pub use pinger::HealthPinger;
