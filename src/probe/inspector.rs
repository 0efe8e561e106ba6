//! Report construction from captured probe output

use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::Report;
use crate::ports::ProbeOutput;
use crate::probe::segmenter::{segment, MalformedLinePolicy};

/// Builds [`Report`]s from raw report text
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportInspector {
    policy: MalformedLinePolicy,
}

impl ReportInspector {
    /// Create a new inspector
    pub fn new(policy: MalformedLinePolicy) -> Self {
        Self { policy }
    }

    /// Malformed-line policy in effect
    pub fn policy(&self) -> MalformedLinePolicy {
        self.policy
    }

    /// Build a report from both captured channels, channel A first
    pub fn inspect(&self, output: &ProbeOutput) -> Result<Report, DomainError> {
        debug!(
            stdout_lines = output.stdout.len(),
            stderr_lines = output.stderr.len(),
            "Segmenting probe output"
        );
        self.inspect_lines(output.lines())
    }

    /// Build a report from an already ordered line sequence
    pub fn inspect_lines<I, S>(&self, lines: I) -> Result<Report, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let blocks = segment(lines, self.policy)?;
        let report = Report::from_field_stores(blocks);

        info!(
            streams = report.len(),
            video = report.video_streams().len(),
            audio = report.audio_streams().len(),
            subtitle = report.subtitle_streams().len(),
            "Report built"
        );
        Ok(report)
    }

    /// Build a report from a single block of text
    pub fn inspect_text(&self, text: &str) -> Result<Report, DomainError> {
        self.inspect_lines(text.lines())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_order_is_stdout_then_stderr() {
        // A block split across the channels only closes because stderr
        // follows stdout.
        let output = ProbeOutput::from_text(
            "[STREAM]\ncodec_type=video\n",
            "width=640\nheight=480\n[/STREAM]\n",
        );
        let report = ReportInspector::default().inspect(&output).unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report.streams()[0].get("width"), Some("640"));
        assert_eq!(report.video_streams().len(), 1);
    }

    #[test]
    fn test_stderr_banner_is_skipped() {
        let output = ProbeOutput::from_text(
            "[STREAM]\ncodec_type=audio\n[/STREAM]\n",
            "ffprobe version 6.1 Copyright (c) 2007-2023 the FFmpeg developers\n",
        );
        let report = ReportInspector::default().inspect(&output).unwrap();
        assert_eq!(report.audio_streams().len(), 1);

        let strict = ReportInspector::new(MalformedLinePolicy::Fail);
        assert!(matches!(
            strict.inspect(&output),
            Err(DomainError::MalformedLine { line_number: 4, .. })
        ));
    }
}
