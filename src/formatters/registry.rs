//! Formatter registry.
//!
//! # Lifecycle
//! ```text
//! Empty → Loading (FormatterRegistryBuilder) → Ready (FormatterRegistry)
//! ```
//!
//! # Design Decisions
//! - The builder is the only mutable phase; `build()` freezes it
//! - Keys are derived with `topic_key`, same as the topic registry
//! - Last registration for a slug wins
//! - Directory enumeration is sorted by file name so the winner is stable

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::formatters::plugin::{Formatter, PluginError};
use crate::formatters::process::ProcessFormatter;
use crate::formatters::FORMATTER_EXTENSION;
use crate::observability::metrics;
use crate::routing::topic_key;

/// Read-only slug → formatter map.
#[derive(Default)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Arc<dyn Formatter>>,
}

impl FormatterRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> FormatterRegistryBuilder {
        FormatterRegistryBuilder::default()
    }

    /// Load every formatter module in `dir`, creating it if missing.
    pub async fn load_from_folder(dir: &Path, timeout: Duration) -> Result<Self, PluginError> {
        let mut builder = Self::builder();
        let summary = builder.load_folder(dir, timeout).await?;
        tracing::info!(
            dir = %dir.display(),
            loaded = summary.loaded.len(),
            skipped = summary.skipped.len(),
            "Formatter modules loaded"
        );
        Ok(builder.build())
    }

    pub fn resolve(&self, slug: &str) -> Option<Arc<dyn Formatter>> {
        self.formatters.get(&topic_key(slug)).cloned()
    }

    pub fn slugs(&self) -> Vec<&str> {
        let mut slugs: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        slugs.sort_unstable();
        slugs
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

impl std::fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterRegistry")
            .field("slugs", &self.slugs())
            .finish()
    }
}

/// What happened to each module in a folder scan.
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// `(slug, path)` of every module that loaded, in load order.
    pub loaded: Vec<(String, PathBuf)>,
    /// Modules that were skipped and why.
    pub skipped: Vec<PluginError>,
}

/// Registry under construction.
#[derive(Default)]
pub struct FormatterRegistryBuilder {
    formatters: HashMap<String, Arc<dyn Formatter>>,
}

impl FormatterRegistryBuilder {
    /// Register a formatter under its own slug, replacing any previous one.
    pub fn register(&mut self, formatter: Arc<dyn Formatter>) -> Option<Arc<dyn Formatter>> {
        let key = topic_key(formatter.slug());
        let previous = self.formatters.insert(key.clone(), formatter);
        if previous.is_some() {
            tracing::warn!(slug = %key, "Formatter slug registered twice, last one wins");
        }
        previous
    }

    /// Load the modules in `dir`. Only a directory that cannot be created or
    /// listed is an error; broken modules end up in the summary.
    pub async fn load_folder(&mut self, dir: &Path, timeout: Duration) -> Result<LoadSummary, PluginError> {
        let dir_err = |source| PluginError::Directory {
            path: dir.to_path_buf(),
            source,
        };

        tokio::fs::create_dir_all(dir).await.map_err(dir_err)?;

        let mut modules = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await.map_err(dir_err)?;
        while let Some(entry) = entries.next_entry().await.map_err(dir_err)? {
            let path = entry.path();
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && path.extension().is_some_and(|ext| ext == FORMATTER_EXTENSION) {
                modules.push(path);
            }
        }
        modules.sort();

        let mut summary = LoadSummary::default();
        for path in modules {
            match ProcessFormatter::load(path, timeout).await {
                Ok(formatter) => {
                    let loaded = (formatter.slug().to_string(), formatter.path().to_path_buf());
                    tracing::info!(slug = %loaded.0, path = %loaded.1.display(), "Loaded formatter");
                    metrics::record_formatter_load(true);
                    self.register(Arc::new(formatter));
                    summary.loaded.push(loaded);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping formatter module");
                    metrics::record_formatter_load(false);
                    summary.skipped.push(e);
                }
            }
        }

        Ok(summary)
    }

    pub fn build(self) -> FormatterRegistry {
        FormatterRegistry {
            formatters: self.formatters,
        }
    }
}
