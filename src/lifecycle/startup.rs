//! Startup orchestration.
//!
//! # Responsibilities
//! - Load the configuration document (or write the first-run template)
//! - Connect to the chat API and make sure every topic has a channel
//! - Load formatter modules and the health pinger
//! - Hand back the state the HTTP server needs
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - The caller binds listeners only after this returns

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::chat::{ChatApi, ChatError, TelegramClient};
use crate::config::{ConfigError, ConfigStore};
use crate::formatters::{FormatterRegistry, PluginError};
use crate::health::HealthPinger;
use crate::http::AppState;
use crate::observability::metrics;
use crate::provisioning::{ensure_default_channel, ChannelReconciler, ProvisionError};

/// Errors that stop the hub from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("chat API unavailable: {0}")]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error("cannot load formatters: {0}")]
    Formatters(#[from] PluginError),
}

impl StartupError {
    /// The first-run template was written; the process should exit cleanly.
    pub fn bootstrap_halt(&self) -> Option<&PathBuf> {
        match self {
            StartupError::Config(ConfigError::BootstrapHalt(path)) => Some(path),
            _ => None,
        }
    }
}

/// Load the document at `settings` and bring every subsystem up.
pub async fn start(settings: &Path) -> Result<AppState, StartupError> {
    let store = Arc::new(ConfigStore::load(settings)?);
    let config = store.snapshot();

    if let Some(addr) = config.metrics_address.as_deref() {
        // Validation already rejected unparsable addresses.
        if let Ok(addr) = addr.parse() {
            metrics::init_metrics(addr);
        }
    }

    let chat = TelegramClient::connect(
        &config.api_base_url,
        &config.token,
        Duration::from_secs(config.api_timeout_secs),
    )
    .await?;

    prepare(store, Arc::new(chat)).await
}

/// Provision channels and load the remaining subsystems around `store`.
pub async fn prepare(
    store: Arc<ConfigStore>,
    chat: Arc<dyn ChatApi>,
) -> Result<AppState, StartupError> {
    ensure_default_channel(&store, chat.as_ref()).await?;

    let mut reconciler = ChannelReconciler::new(chat.clone());
    let report = reconciler.reconcile_store(&store).await?;
    if !report.is_complete() {
        for failure in &report.failures {
            tracing::warn!(error = %failure, "Topic left without a channel");
        }
    }

    let config = store.snapshot();
    let formatters = FormatterRegistry::load_from_folder(
        Path::new(&config.formatters_dir),
        Duration::from_secs(config.formatter_timeout_secs),
    )
    .await?;

    if !config.auth_enabled() {
        tracing::warn!("auth_token is empty, /send accepts unauthenticated requests");
    }

    let health = HealthPinger::from_config(&config).map(Arc::new);
    if health.is_none() {
        tracing::info!("healthcheck_uuid not set, heartbeat disabled");
    }

    tracing::info!(
        chat_id = config.chat_id,
        topics = store.topics().len(),
        formatters = formatters.len(),
        "Hub ready"
    );

    Ok(AppState {
        store,
        chat,
        formatters: Arc::new(formatters),
        health,
    })
}
