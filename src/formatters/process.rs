//! Formatter modules that run as child processes.
//!
//! A module is a shell script invoked as `sh <file> <op>`:
//!
//! - `slug`: exit 0 and print the topic slug on stdout
//! - `format`: read the payload on stdin, exit 0 and print the message text
//!
//! Any other exit code, or running past the deadline, is an error. A module
//! that fails the `slug` handshake is never registered.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::formatters::plugin::{Formatter, PluginError};

/// A formatter backed by an external script.
#[derive(Debug)]
pub struct ProcessFormatter {
    path: PathBuf,
    slug: String,
    timeout: Duration,
}

impl ProcessFormatter {
    /// Run the handshake and return the loaded formatter.
    pub async fn load(path: impl Into<PathBuf>, timeout: Duration) -> Result<Self, PluginError> {
        let path = path.into();
        let stdout = invoke(&path, "slug", None, timeout).await?;

        let slug = stdout.trim().to_string();
        if slug.is_empty() {
            return Err(PluginError::EmptySlug { path });
        }

        Ok(Self {
            path,
            slug,
            timeout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Formatter for ProcessFormatter {
    fn slug(&self) -> &str {
        &self.slug
    }

    async fn format(&self, input: &str) -> Result<String, PluginError> {
        let stdout = invoke(&self.path, "format", Some(input), self.timeout).await?;
        Ok(stdout.trim_end_matches(['\r', '\n']).to_string())
    }
}

async fn invoke(
    path: &Path,
    op: &'static str,
    input: Option<&str>,
    timeout: Duration,
) -> Result<String, PluginError> {
    let spawn_err = |source| PluginError::Spawn {
        path: path.to_path_buf(),
        op,
        source,
    };

    let mut child = Command::new("sh")
        .arg(path)
        .arg(op)
        .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(spawn_err)?;

    // Feed stdin concurrently so a module that streams output cannot deadlock us.
    let writer = match (input, child.stdin.take()) {
        (Some(input), Some(mut stdin)) => {
            let data = input.as_bytes().to_vec();
            Some(tokio::spawn(async move { stdin.write_all(&data).await }))
        }
        _ => None,
    };

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| PluginError::Timeout {
            path: path.to_path_buf(),
            op,
            timeout,
        })?
        .map_err(spawn_err)?;

    if let Some(writer) = writer {
        match writer.await {
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(spawn_err(e)),
            _ => {}
        }
    }

    if !output.status.success() {
        return Err(PluginError::Failed {
            path: path.to_path_buf(),
            op,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn module(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    const UPPER: &str = r#"
case "$1" in
  slug) echo "Deploys" ;;
  format) tr '[:lower:]' '[:upper:]' ;;
  *) exit 2 ;;
esac
"#;

    #[tokio::test]
    async fn test_handshake_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = module(dir.path(), "upper.fmt", UPPER);

        let formatter = ProcessFormatter::load(&path, Duration::from_secs(5)).await.unwrap();
        assert_eq!(formatter.slug(), "Deploys");
        assert_eq!(formatter.path(), path.as_path());
        assert_eq!(formatter.format("hello\n").await.unwrap(), "HELLO");
    }

    #[tokio::test]
    async fn test_large_payload_round_trips_through_pipes() {
        let dir = tempfile::tempdir().unwrap();
        let path = module(
            dir.path(),
            "cat.fmt",
            "if [ \"$1\" = slug ]; then echo cat; else cat; fi\n",
        );

        let formatter = ProcessFormatter::load(&path, Duration::from_secs(5)).await.unwrap();
        let input = "x".repeat(512 * 1024);
        assert_eq!(formatter.format(&input).await.unwrap().len(), input.len());
    }

    #[tokio::test]
    async fn test_empty_slug_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = module(dir.path(), "silent.fmt", "exit 0\n");

        let err = ProcessFormatter::load(&path, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, PluginError::EmptySlug { .. }));
    }

    #[tokio::test]
    async fn test_failing_handshake() {
        let dir = tempfile::tempdir().unwrap();
        let path = module(dir.path(), "broken.fmt", "echo nope >&2\nexit 3\n");

        match ProcessFormatter::load(&path, Duration::from_secs(5)).await.unwrap_err() {
            PluginError::Failed { op, code, stderr, .. } => {
                assert_eq!(op, "slug");
                assert_eq!(code, 3);
                assert_eq!(stderr, "nope");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_format_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = module(
            dir.path(),
            "slow.fmt",
            "if [ \"$1\" = slug ]; then echo slow; else sleep 5; fi\n",
        );

        let formatter = ProcessFormatter::load(&path, Duration::from_millis(500)).await.unwrap();
        let err = formatter.format("x").await.unwrap_err();
        assert!(matches!(err, PluginError::Timeout { op: "format", .. }));
    }
}
