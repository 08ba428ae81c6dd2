//! HTTP ingress subsystem.
//!
//! # Data Flow
//! ```text
//! POST /send[/{slug}]
//!     → server.rs (request id, trace, timeout, body limit)
//!     → auth.rs (shared-secret header check → 401)
//!     → send.rs (resolve topic + formatter, deliver)
//!     → message.rs (render body, fallback and error notices)
//!     → ChatApi::send_message
//!     → bare 200 / 500
//! ```

pub mod auth;
pub mod message;
pub mod send;
pub mod server;

pub use send::DeliveryError;
pub use server::{AppState, HttpServer};
