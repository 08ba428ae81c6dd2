//! Telegram Bot API client with timeout and error handling.
//!
//! # Responsibilities
//! - Verify the bot token at startup
//! - Create forum topics, send messages, read recent updates
//! - Bound every call with a deadline
//! - Keep the token out of error messages and logs

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::chat::types::{
    ApiResponse, ChatError, CreateForumTopic, ForumTopic, GetUpdates, MembershipEvent,
    SendMessage, Update, User,
};
use crate::chat::ChatApi;

const PARSE_MODE: &str = "MarkdownV2";

/// Bot API client.
pub struct TelegramClient {
    http: reqwest::Client,
    /// `{api_base_url}/bot{token}`; never logged.
    endpoint: String,
    timeout_duration: Duration,
    /// Serializes outbound sends.
    send_lock: Mutex<()>,
}

impl TelegramClient {
    /// Create a client without contacting the API.
    pub fn new(api_base_url: &str, token: &str, timeout_duration: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/bot{}", api_base_url.trim_end_matches('/'), token),
            timeout_duration,
            send_lock: Mutex::new(()),
        }
    }

    /// Create a client and verify the token with `getMe`.
    pub async fn connect(
        api_base_url: &str,
        token: &str,
        timeout_duration: Duration,
    ) -> Result<Self, ChatError> {
        let client = Self::new(api_base_url, token, timeout_duration);
        let me: User = client.call("getMe", &serde_json::json!({})).await?;

        tracing::info!(
            bot = me.username.as_deref().unwrap_or("<unnamed>"),
            "Telegram client initialized"
        );
        Ok(client)
    }

    async fn call<P, R>(&self, method: &'static str, params: &P) -> Result<R, ChatError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.endpoint, method);
        let exchange = async {
            let response = self.http.post(&url).json(params).send().await?;
            response.json::<ApiResponse<R>>().await
        };

        let envelope = timeout(self.timeout_duration, exchange)
            .await
            .map_err(|_| ChatError::Timeout {
                method,
                timeout: self.timeout_duration,
            })?
            .map_err(|e| ChatError::Transport {
                method,
                source: e.without_url(),
            })?;

        if !envelope.ok {
            return Err(ChatError::Api {
                method,
                code: envelope.error_code.unwrap_or_default(),
                description: envelope.description.unwrap_or_default(),
            });
        }

        envelope.result.ok_or(ChatError::MissingResult(method))
    }
}

#[async_trait]
impl ChatApi for TelegramClient {
    async fn create_channel(
        &self,
        parent_group_id: i64,
        name: &str,
        accent_color: u32,
    ) -> Result<i64, ChatError> {
        let params = CreateForumTopic {
            chat_id: parent_group_id,
            name,
            icon_color: accent_color,
        };
        let topic: ForumTopic = self.call("createForumTopic", &params).await?;

        tracing::debug!(name = %name, thread_id = topic.message_thread_id, "Forum topic created");
        Ok(topic.message_thread_id)
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        thread_id: Option<i64>,
    ) -> Result<(), ChatError> {
        let params = SendMessage {
            chat_id,
            text,
            parse_mode: PARSE_MODE,
            message_thread_id: thread_id,
        };

        let _guard = self.send_lock.lock().await;
        let _: serde_json::Value = self.call("sendMessage", &params).await?;
        Ok(())
    }

    async fn recent_membership_events(&self) -> Result<Vec<MembershipEvent>, ChatError> {
        let updates: Vec<Update> = self.call("getUpdates", &GetUpdates { offset: 0 }).await?;
        Ok(updates
            .into_iter()
            .filter_map(Update::into_membership_event)
            .collect())
    }
}
