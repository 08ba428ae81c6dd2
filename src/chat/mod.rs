//! Outbound chat subsystem.
//!
//! # Data Flow
//! ```text
//! provisioning / http handlers
//!     → ChatApi trait (this file)
//!     → telegram.rs (Bot API over HTTPS, bounded by a timeout)
//!     → markdown.rs (MarkdownV2 escaping for message text)
//! ```
//!
//! # Design Decisions
//! - The core only talks to the `ChatApi` trait, so tests swap in fakes
//! - No retries here; callers decide what a failure means
//! - Message sends are serialized by the client

pub mod markdown;
pub mod telegram;
pub mod types;

use async_trait::async_trait;

pub use telegram::TelegramClient;
pub use types::{ChatError, MembershipEvent};

/// Operations the hub needs from the remote chat system.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Create a channel (forum topic) inside `parent_group_id`.
    async fn create_channel(
        &self,
        parent_group_id: i64,
        name: &str,
        accent_color: u32,
    ) -> Result<i64, ChatError>;

    /// Send `text` to `chat_id`, optionally into a channel thread.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        thread_id: Option<i64>,
    ) -> Result<(), ChatError>;

    /// Recent bot membership changes, used to discover the default group.
    async fn recent_membership_events(&self) -> Result<Vec<MembershipEvent>, ChatError>;
}

#[cfg(test)]
pub(crate) mod fake;
