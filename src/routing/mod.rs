//! Topic routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming slug (percent-decoded by the HTTP router)
//!     → slug.rs (re-derive the canonical, lower-cased key)
//!     → registry.rs (O(1) lookup)
//!     → Return: channel id or no match
//!
//! Registry build (on every config publish):
//!     Topic[]
//!     → Derive key per topic (explicit slug or name)
//!     → Build a fresh HashMap
//!     → Atomic swap of Arc<HashMap>
//! ```
//!
//! # Design Decisions
//! - Rebuilt wholesale, never patched: removed topics disappear
//! - Readers never block and never see a half-built map
//! - Keys and lookups go through the same derivation (`topic_key`)
//! - Last topic wins when two resolve to the same key

pub mod registry;
pub mod slug;

pub use registry::TopicRegistry;
pub use slug::{slugify, topic_key};
