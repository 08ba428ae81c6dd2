//! Channel provisioning subsystem.
//!
//! # Data Flow
//! ```text
//! Startup / config reload:
//!     default_channel.rs (chat_id == 0?)
//!         → recent membership events → newest forum group
//!         → ConfigStore::set_default_channel
//!     reconciler.rs
//!         → for each topic with id == 0: ChatApi::create_channel
//!         → record id + slug, skip failures
//!         → ConfigStore::update_topics (always)
//! ```
//!
//! # Design Decisions
//! - One failing topic never aborts the pass
//! - A fully provisioned list makes zero API calls
//! - Accent colors are cosmetic; any palette entry will do

pub mod default_channel;
pub mod palette;
pub mod reconciler;

use thiserror::Error;

use crate::chat::ChatError;
use crate::config::ConfigError;

pub use default_channel::{ensure_default_channel, latest_forum_group};
pub use reconciler::{ChannelReconciler, ReconcileReport};

/// Errors raised while provisioning channels.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Creating the channel for one topic failed. Non-fatal.
    #[error("failed to create channel for topic '{topic}': {source}")]
    CreateChannel {
        topic: String,
        #[source]
        source: ChatError,
    },

    /// Channels need a parent group and none is configured.
    #[error("default channel is not set, cannot provision topics")]
    MissingParentGroup,

    /// No membership event pointed at a forum-enabled group.
    #[error("no forum-enabled group found in recent updates; add the bot to a forum group and retry")]
    NoForumGroup,

    #[error(transparent)]
    Api(#[from] ChatError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
