//! The formatter capability.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Turns an inbound payload into MarkdownV2 for one topic.
#[async_trait]
pub trait Formatter: Send + Sync {
    /// Slug of the topic this formatter serves.
    fn slug(&self) -> &str;

    /// Format `input` into message text.
    async fn format(&self, input: &str) -> Result<String, PluginError>;
}

/// Errors raised while loading or running a formatter module.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("failed to prepare formatter directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run {op} on formatter {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        op: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("formatter {} timed out after {timeout:?} during {op}", .path.display())]
    Timeout {
        path: PathBuf,
        op: &'static str,
        timeout: Duration,
    },

    #[error("formatter {} failed during {op} (exit code {code}): {stderr}", .path.display())]
    Failed {
        path: PathBuf,
        op: &'static str,
        code: i32,
        stderr: String,
    },

    #[error("formatter {} did not report a slug", .path.display())]
    EmptySlug { path: PathBuf },
}
