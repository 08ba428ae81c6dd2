//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings.json
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → store.rs (publish as Arc<AppConfig>, rebuild topic registry)
//!     → shared via Arc<ConfigStore> to all subsystems
//!
//! On update (reconciler, default channel bootstrap):
//!     store.rs takes the writer lock
//!     → loader.rs writes temp file + rename
//!     → atomic swap of Arc<AppConfig>
//!
//! On external edit:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → store.rs publishes it if it differs from the current snapshot
//! ```
//!
//! # Design Decisions
//! - Missing file on startup writes a template and halts the process
//! - Readers never block; writers are serialized
//! - The file is never left half-written

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::ConfigError;
pub use schema::{AppConfig, Topic};
pub use store::ConfigStore;
pub use validation::ValidationError;
