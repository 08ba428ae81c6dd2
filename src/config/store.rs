//! Persistent configuration store.
//!
//! Owns the configuration document. Readers get an `Arc` snapshot that is
//! swapped atomically on every change; writers are serialized by a mutex
//! around read-modify-persist-publish. The topic registry is derived state
//! and is rebuilt from the topic list on every publish.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use crate::config::loader::{load_config, save_config, ConfigError};
use crate::config::schema::{AppConfig, Topic};
use crate::routing::TopicRegistry;

pub struct ConfigStore {
    path: PathBuf,
    current: ArcSwap<AppConfig>,
    topics: Arc<TopicRegistry>,
    writer: Mutex<()>,
}

impl ConfigStore {
    /// Load the document at `path` and publish it.
    ///
    /// On first run (no file) a template is written and
    /// [`ConfigError::BootstrapHalt`] is returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            save_config(&path, &AppConfig::bootstrap())?;
            tracing::info!(
                path = %path.display(),
                "Configuration file not found, wrote a default one. Fill it in and restart"
            );
            return Err(ConfigError::BootstrapHalt(path));
        }

        let config = load_config(&path)?;
        tracing::info!(
            path = %path.display(),
            topics = config.topics.len(),
            "Configuration loaded"
        );

        Ok(Self::with_config(path, config))
    }

    /// Build a store around an already validated document.
    pub fn with_config(path: impl Into<PathBuf>, config: AppConfig) -> Self {
        let topics = Arc::new(TopicRegistry::from_topics(&config.topics));
        Self {
            path: path.into(),
            current: ArcSwap::from_pointee(config),
            topics,
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The most recently published document.
    pub fn snapshot(&self) -> Arc<AppConfig> {
        self.current.load_full()
    }

    /// Handle to the derived topic registry.
    pub fn topics(&self) -> Arc<TopicRegistry> {
        self.topics.clone()
    }

    /// Replace the topic list and persist the document.
    pub fn update_topics(&self, topics: Vec<Topic>) -> Result<(), ConfigError> {
        self.mutate(|config| config.topics = topics)
    }

    /// Set the default channel id and persist the document.
    pub fn set_default_channel(&self, id: i64) -> Result<(), ConfigError> {
        self.mutate(|config| config.chat_id = id)
    }

    /// Publish a document read from disk by someone else (the file watcher).
    ///
    /// Topics that are already provisioned keep their channel id even when the
    /// incoming copy still says `id: 0`; a stale or duplicated read never
    /// rolls an id back. Returns `false` without touching anything when the
    /// result equals the current snapshot, which is what happens after our
    /// own writes.
    pub fn replace(&self, mut config: AppConfig) -> bool {
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        self.keep_provisioned_ids(&mut config.topics);
        if *self.current.load_full() == config {
            return false;
        }

        self.publish(config);
        true
    }

    /// Re-read the backing file and publish it if it changed.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let config = load_config(&self.path)?;
        Ok(self.replace(config))
    }

    fn mutate(&self, apply: impl FnOnce(&mut AppConfig)) -> Result<(), ConfigError> {
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        let mut next = AppConfig::clone(&self.current.load());
        apply(&mut next);

        // Disk first: a failed write leaves both the file and the snapshot untouched.
        save_config(&self.path, &next)?;
        self.publish(next);
        Ok(())
    }

    /// Fill in ids for pending topics whose key already maps to a channel.
    fn keep_provisioned_ids(&self, topics: &mut [Topic]) {
        let known = self.topics.snapshot();
        for topic in topics.iter_mut().filter(|t| !t.is_provisioned()) {
            let key = TopicRegistry::key_for(topic);
            if let Some(&id) = known.get(&key).filter(|id| **id != 0) {
                tracing::debug!(slug = %key, id, "Keeping channel id of provisioned topic");
                topic.id = id;
                if topic.slug.is_empty() {
                    topic.slug = key;
                }
            }
        }
    }

    fn publish(&self, config: AppConfig) {
        self.topics.rebuild(&config.topics);
        self.current.store(Arc::new(config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::load_config;

    fn config() -> AppConfig {
        AppConfig {
            token: "123:abc".into(),
            chat_id: -100,
            topics: vec![
                Topic {
                    name: "Ops".into(),
                    slug: "ops".into(),
                    id: 42,
                },
                Topic::new("Pending"),
            ],
            ..AppConfig::default()
        }
    }

    fn store_in(dir: &Path) -> ConfigStore {
        let path = dir.join("settings.json");
        save_config(&path, &config()).unwrap();
        ConfigStore::load(&path).unwrap()
    }

    #[test]
    fn test_first_run_writes_template_and_halts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        match ConfigStore::load(&path) {
            Err(ConfigError::BootstrapHalt(written)) => assert_eq!(written, path),
            other => panic!("expected bootstrap halt, got {:?}", other.map(|_| ())),
        }

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["port"], 8080);
        assert_eq!(raw["topics"], serde_json::json!([{ "name": "" }]));
    }

    #[test]
    fn test_load_derives_registry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        assert_eq!(store.topics().lookup("ops"), Some(42));
        assert_eq!(store.topics().lookup("pending"), Some(0));
        assert_eq!(store.snapshot().chat_id, -100);
    }

    #[test]
    fn test_update_topics_persists_and_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store
            .update_topics(vec![Topic {
                name: "Dev".into(),
                slug: "dev".into(),
                id: 9,
            }])
            .unwrap();

        assert_eq!(store.topics().lookup("dev"), Some(9));
        assert_eq!(store.topics().lookup("ops"), None);

        let on_disk = load_config(store.path()).unwrap();
        assert_eq!(on_disk, *store.snapshot());
    }

    #[test]
    fn test_set_default_channel_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.set_default_channel(-100999).unwrap();

        assert_eq!(store.snapshot().chat_id, -100999);
        assert_eq!(load_config(store.path()).unwrap().chat_id, -100999);
        assert_eq!(store.topics().lookup("ops"), Some(42));
    }

    #[test]
    fn test_failed_persist_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_config(dir.path().join("missing").join("settings.json"), config());

        let err = store.update_topics(Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Persist { .. }));
        assert_eq!(store.snapshot().topics.len(), 2);
        assert_eq!(store.topics().lookup("ops"), Some(42));
    }

    #[test]
    fn test_replace_ignores_identical_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        assert!(!store.replace(config()));

        let mut changed = config();
        changed.topics.push(Topic::new("Security"));
        assert!(store.replace(changed));
        assert_eq!(store.topics().lookup("security"), Some(0));
    }

    #[test]
    fn test_stale_copy_does_not_roll_back_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut edited = config();
        edited.topics.push(Topic::new("Security"));
        assert!(store.replace(edited.clone()));

        let mut provisioned = store.snapshot().topics.clone();
        provisioned[1].id = 7;
        provisioned[1].slug = "pending".into();
        provisioned[2].id = 8;
        provisioned[2].slug = "security".into();
        store.update_topics(provisioned).unwrap();

        // A second read of the same edit, taken before provisioning finished.
        assert!(!store.replace(edited));
        assert_eq!(store.topics().lookup("security"), Some(8));
        assert_eq!(store.topics().lookup("pending"), Some(7));

        // Genuinely new topics in a stale copy still get through, ids intact.
        let mut later = config();
        later.topics.push(Topic::new("Security"));
        later.topics.push(Topic::new("Billing"));
        assert!(store.replace(later));
        assert_eq!(store.topics().lookup("security"), Some(8));
        assert_eq!(store.topics().lookup("billing"), Some(0));
    }

    #[test]
    fn test_reload_picks_up_external_edit() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(!store.reload().unwrap());

        let mut edited = config();
        edited.topics.remove(0);
        save_config(store.path(), &edited).unwrap();

        assert!(store.reload().unwrap());
        assert_eq!(store.topics().lookup("ops"), None);
    }

    #[test]
    fn test_concurrent_writers_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(dir.path()));

        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        store.set_default_channel(-i).unwrap();
                    } else {
                        let mut topics = store.snapshot().topics.clone();
                        topics[1].id = i;
                        store.update_topics(topics).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(load_config(store.path()).unwrap(), *store.snapshot());
    }
}
