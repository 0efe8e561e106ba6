//! FFprobe adapter for media file probing
//!
//! Runs `ffprobe -show_streams <file>` and captures both output channels.
//! The installation check and the input path check happen first, so the
//! caller gets a precise error before any report text is produced.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::ports::*;
use crate::probe::MediaValidator;

/// Default executable name, resolved through `PATH`
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// FFprobe-based probe adapter
#[derive(Debug, Clone)]
pub struct FFprobeAdapter {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_FFPROBE)
    }
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter for the given executable
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Bound the report capture by a timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Executable this adapter runs
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn tool_name(&self) -> String {
        self.binary.display().to_string()
    }

    /// Check the tool can be executed at all
    pub async fn ensure_available(&self) -> Result<(), DomainError> {
        let status = Command::new(&self.binary)
            .arg("-h")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| DomainError::ToolNotFound {
                tool: self.tool_name(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(DomainError::ToolNotFound {
                tool: self.tool_name(),
                reason: format!("`-h` exited with {}", status),
            });
        }
        Ok(())
    }

    async fn check_and_capture(&self, path: &Path) -> Result<ProbeOutput, DomainError> {
        self.ensure_available().await?;
        self.capture(path).await
    }

    async fn capture(&self, path: &Path) -> Result<ProbeOutput, DomainError> {
        debug!(tool = %self.tool_name(), path = %path.display(), "Running probe");

        let output = Command::new(&self.binary)
            .arg("-show_streams")
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DomainError::InvocationFailed {
                tool: self.tool_name(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let detail = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no diagnostic output");
            return Err(DomainError::InvocationFailed {
                tool: self.tool_name(),
                reason: format!("exited with {}: {}", output.status, detail.trim()),
            });
        }

        Ok(ProbeOutput::from_text(&stdout, &stderr))
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_streams(&self, path: &Path) -> Result<ProbeOutput, DomainError> {
        MediaValidator::validate_input(path)?;

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.check_and_capture(path))
                .await
                .map_err(|_| DomainError::InvocationFailed {
                    tool: self.tool_name(),
                    reason: format!("timed out after {:?}", limit),
                })??,
            None => self.check_and_capture(path).await?,
        };

        info!(
            path = %path.display(),
            stdout_lines = output.stdout.len(),
            stderr_lines = output.stderr.len(),
            "Probe output captured"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_path_reported_before_tool_check() {
        let adapter = FFprobeAdapter::new("streamprobe-no-such-tool");
        let error = adapter
            .probe_streams(Path::new("/definitely/not/here.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(error, DomainError::PathNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_tool() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("input.mp4");
        std::fs::write(&media, b"data").unwrap();

        let adapter = FFprobeAdapter::new("streamprobe-no-such-tool");
        let error = adapter.probe_streams(&media).await.unwrap_err();
        assert!(matches!(error, DomainError::ToolNotFound { .. }));
        assert!(error.is_input_error());
    }
}
