// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;

/// Port for the external inspection tool.
///
/// Implementations locate and run the tool however they like; the core only
/// needs the two captured output channels.
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Capture the stream report for a media file.
    ///
    /// Fails with [`DomainError::ToolNotFound`], [`DomainError::InvocationFailed`]
    /// or [`DomainError::PathNotFound`].
    async fn probe_streams(&self, path: &Path) -> Result<ProbeOutput, DomainError>;
}

/// Lines captured from one invocation of the inspection tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeOutput {
    /// Channel A (standard output), in arrival order
    pub stdout: Vec<String>,
    /// Channel B (standard error), in arrival order
    pub stderr: Vec<String>,
}

impl ProbeOutput {
    /// Create from both channels
    pub fn new(stdout: Vec<String>, stderr: Vec<String>) -> Self {
        Self { stdout, stderr }
    }

    /// Split raw channel text into lines
    pub fn from_text(stdout: &str, stderr: &str) -> Self {
        Self {
            stdout: stdout.lines().map(str::to_string).collect(),
            stderr: stderr.lines().map(str::to_string).collect(),
        }
    }

    /// All of channel A, then all of channel B
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout
            .iter()
            .chain(self.stderr.iter())
            .map(String::as_str)
    }
}
