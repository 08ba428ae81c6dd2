//! In-memory `ChatApi` for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::chat::{ChatApi, ChatError, MembershipEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub thread_id: Option<i64>,
}

/// Records every call. Channel ids are handed out from 100 upwards.
#[derive(Default)]
pub struct FakeChat {
    pub created: Mutex<Vec<(i64, String, u32)>>,
    pub sent: Mutex<Vec<SentMessage>>,
    pub events: Vec<MembershipEvent>,
    pub failing_names: HashSet<String>,
    pub fail_sends: bool,
}

impl FakeChat {
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            failing_names: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<(i64, String, u32)> {
        self.created.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

fn rejected(method: &'static str) -> ChatError {
    ChatError::Api {
        method,
        code: 400,
        description: "Bad Request".into(),
    }
}

#[async_trait]
impl ChatApi for FakeChat {
    async fn create_channel(
        &self,
        parent_group_id: i64,
        name: &str,
        accent_color: u32,
    ) -> Result<i64, ChatError> {
        if self.failing_names.contains(name) {
            return Err(rejected("createForumTopic"));
        }
        let mut created = self.created.lock().unwrap();
        created.push((parent_group_id, name.to_string(), accent_color));
        Ok(99 + created.len() as i64)
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        thread_id: Option<i64>,
    ) -> Result<(), ChatError> {
        if self.fail_sends {
            return Err(rejected("sendMessage"));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            thread_id,
        });
        Ok(())
    }

    async fn recent_membership_events(&self) -> Result<Vec<MembershipEvent>, ChatError> {
        Ok(self.events.clone())
    }
}
