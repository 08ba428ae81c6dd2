//! Payload formatter subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     formatters dir (created if missing)
//!     → registry.rs (enumerate *.fmt files in name order)
//!     → process.rs (handshake: `sh <file> slug`)
//!     → builder keyed by `topic_key(slug)`, last loaded wins
//!     → frozen FormatterRegistry shared via Arc
//!
//! Request time:
//!     slug → FormatterRegistry::resolve
//!     → Formatter::format (`sh <file> format`, payload on stdin)
//! ```
//!
//! # Design Decisions
//! - A module that fails to load is logged and skipped
//! - Registry is immutable once built; readers need no locks
//! - Formatters run out of process, so a broken one cannot take the hub down

pub mod plugin;
pub mod process;
pub mod registry;

pub use plugin::{Formatter, PluginError};
pub use process::ProcessFormatter;
pub use registry::{FormatterRegistry, FormatterRegistryBuilder, LoadSummary};

/// File extension of formatter modules.
pub const FORMATTER_EXTENSION: &str = "fmt";
