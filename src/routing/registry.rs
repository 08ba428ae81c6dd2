//! Topic registry: slug → channel id.
//!
//! # Responsibilities
//! - Derive lookup keys from the topic list
//! - Answer lookups from many concurrent request handlers
//! - Replace the whole index when the configuration changes
//!
//! # Design Decisions
//! - The map lives behind an `ArcSwap`; a rebuild builds a new map off to the
//!   side and publishes it with one pointer swap
//! - Each lookup loads one snapshot, so a reader sees either the old or the
//!   new index, never a mix

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::Topic;
use crate::routing::slug::topic_key;

/// Concurrent, rebuild-by-swap index from slug to channel id.
#[derive(Debug, Default)]
pub struct TopicRegistry {
    entries: ArcSwap<HashMap<String, i64>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a topic list.
    pub fn from_topics(topics: &[Topic]) -> Self {
        let registry = Self::new();
        registry.rebuild(topics);
        registry
    }

    /// Lookup key for a topic: its explicit slug, or one derived from its name.
    pub fn key_for(topic: &Topic) -> String {
        let source = if topic.slug.trim().is_empty() { &topic.name } else { &topic.slug };
        topic_key(source)
    }

    /// Replace the index with one derived from `topics`.
    pub fn rebuild(&self, topics: &[Topic]) {
        let mut entries = HashMap::with_capacity(topics.len());
        for topic in topics {
            if topic.name.trim().is_empty() && topic.slug.trim().is_empty() {
                continue;
            }
            let key = Self::key_for(topic);
            if let Some(previous) = entries.insert(key.clone(), topic.id) {
                tracing::warn!(
                    slug = %key,
                    previous_id = previous,
                    id = topic.id,
                    "Duplicate topic slug, last entry wins"
                );
            }
        }

        tracing::debug!(entries = entries.len(), "Topic registry rebuilt");
        self.entries.store(Arc::new(entries));
    }

    /// Channel id for `slug`, if a topic with that key exists.
    pub fn lookup(&self, slug: &str) -> Option<i64> {
        self.entries.load().get(&topic_key(slug)).copied()
    }

    /// The current index as one consistent snapshot.
    pub fn snapshot(&self) -> Arc<HashMap<String, i64>> {
        self.entries.load_full()
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
