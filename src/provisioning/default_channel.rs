//! Default channel discovery.
//!
//! When the document has no `chat_id`, the newest membership event that
//! points at a forum-enabled group is taken as the default channel. This is
//! best effort: with many groups or a long update backlog the pick may not be
//! the one the operator meant, and they can always set `chat_id` by hand.

use crate::chat::{ChatApi, MembershipEvent};
use crate::config::ConfigStore;
use crate::provisioning::ProvisionError;

/// Chat id of the newest forum group in `events`.
pub fn latest_forum_group(events: &[MembershipEvent]) -> Option<i64> {
    events
        .iter()
        .filter(|e| e.is_forum)
        .max_by_key(|e| e.update_id)
        .map(|e| e.chat_id)
}

/// Make sure the store has a default channel, discovering one if needed.
pub async fn ensure_default_channel(
    store: &ConfigStore,
    api: &dyn ChatApi,
) -> Result<i64, ProvisionError> {
    let current = store.snapshot().chat_id;
    if current != 0 {
        return Ok(current);
    }

    let events = api.recent_membership_events().await?;
    let chat_id = latest_forum_group(&events).ok_or(ProvisionError::NoForumGroup)?;

    store.set_default_channel(chat_id)?;
    tracing::info!(chat_id, "Default channel discovered from recent updates");
    Ok(chat_id)
}
