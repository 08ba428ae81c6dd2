//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Metrics → Chat client → Default channel
//!     → Reconcile topics → Formatters → Health pinger → (caller) listeners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Server drains, background tasks exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then remote state, then listeners
//! - Fail fast: any startup error is fatal, except the first-run halt
//! - Listeners start last (traffic only when channels exist)

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
pub use startup::{prepare, start, StartupError};
