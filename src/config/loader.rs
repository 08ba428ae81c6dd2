//! Configuration loading from and persisting to disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and persistence.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// First run: a template was written and the process should stop so an
    /// operator can fill it in. Not a failure.
    #[error("configuration file not found, a default one has been written to {}", .0.display())]
    BootstrapHalt(PathBuf),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read, parse and validate a configuration document.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Serialize `config` and atomically replace the file at `path`.
///
/// The document is written to a sibling `.tmp` file, synced and then renamed
/// over the target, so readers only ever see the old or the new file.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let data = serde_json::to_vec_pretty(config)?;
    let tmp = path.with_extension("json.tmp");

    let persist = |source| ConfigError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let write = || -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    };

    if let Err(e) = write() {
        let _ = fs::remove_file(&tmp);
        return Err(persist(e));
    }

    tracing::debug!(path = %path.display(), bytes = data.len(), "Configuration persisted");
    Ok(())
}
