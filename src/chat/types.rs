//! Chat API types and error definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to the chat API.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Connection or protocol failure.
    #[error("request to {method} failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The call did not finish before the deadline.
    #[error("{method} timed out after {timeout:?}")]
    Timeout {
        method: &'static str,
        timeout: Duration,
    },

    /// The API answered with `ok: false`.
    #[error("{method} rejected ({code}): {description}")]
    Api {
        method: &'static str,
        code: i64,
        description: String,
    },

    /// The API answered `ok: true` without a result payload.
    #[error("{0} returned no result")]
    MissingResult(&'static str),
}

/// A change of the bot's membership in some chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipEvent {
    pub update_id: i64,
    pub chat_id: i64,
    pub is_forum: bool,
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateForumTopic<'a> {
    pub chat_id: i64,
    pub name: &'a str,
    pub icon_color: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForumTopic {
    pub message_thread_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdates {
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub my_chat_member: Option<ChatMemberUpdated>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMemberUpdated {
    pub chat: Chat,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Chat {
    pub id: i64,
    #[serde(default)]
    pub is_forum: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct User {
    #[serde(default)]
    pub username: Option<String>,
}

impl Update {
    pub fn into_membership_event(self) -> Option<MembershipEvent> {
        let update_id = self.update_id;
        self.my_chat_member.map(|member| MembershipEvent {
            update_id,
            chat_id: member.chat.id,
            is_forum: member.chat.is_forum,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChatError::Api {
            method: "sendMessage",
            code: 400,
            description: "Bad Request: chat not found".into(),
        };
        assert_eq!(err.to_string(), "sendMessage rejected (400): Bad Request: chat not found");

        let err = ChatError::Timeout {
            method: "getUpdates",
            timeout: Duration::from_secs(10),
        };
        assert!(err.to_string().contains("10s"));
    }

    #[test]
    fn test_send_message_omits_missing_thread() {
        let body = SendMessage {
            chat_id: -100,
            text: "hi",
            parse_mode: "MarkdownV2",
            message_thread_id: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("message_thread_id").is_none());
    }

    #[test]
    fn test_update_without_membership_is_ignored() {
        let updates: Vec<Update> = serde_json::from_str(
            r#"[
                {"update_id": 1, "message": {"text": "hi"}},
                {"update_id": 2, "my_chat_member": {"chat": {"id": -100, "is_forum": true}}}
            ]"#,
        )
        .unwrap();

        let events: Vec<MembershipEvent> = updates
            .into_iter()
            .filter_map(Update::into_membership_event)
            .collect();
        assert_eq!(
            events,
            vec![MembershipEvent {
                update_id: 2,
                chat_id: -100,
                is_forum: true
            }]
        );
    }
}
