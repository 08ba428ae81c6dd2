//! Notification hub library.
//!
//! Receives notifications over HTTP and routes them into per-topic channels
//! of a chat group.

pub mod chat;
pub mod config;
pub mod formatters;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod provisioning;
pub mod routing;

pub use config::{AppConfig, ConfigStore};
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
