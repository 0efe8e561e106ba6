// Inspect interactor - Orchestrates the media stream inspection use case

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::probe::{MalformedLinePolicy, ReportInspector};

/// Rendering of an inspection result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Request for media file inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input_path: PathBuf,
    pub format: OutputFormat,
}

impl InspectRequest {
    /// Create new inspect request
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            format: OutputFormat::Text,
        }
    }

    /// Create new inspect request with format
    pub fn with_format(input_path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            input_path: input_path.into(),
            format,
        }
    }
}

/// Response from media file inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub report: Report,
    pub summary: String,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    source: &'a str,
    stream_count: usize,
    video_streams: usize,
    audio_streams: usize,
    subtitle_streams: usize,
    streams: Vec<StreamSummary>,
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    inspector: ReportInspector,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>, policy: MalformedLinePolicy) -> Self {
        Self {
            probe_port,
            inspector: ReportInspector::new(policy),
        }
    }

    /// Probe a media file and summarise its streams
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        let source = request.input_path.display().to_string();
        info!(input = %source, "Starting media stream inspection");

        let output = self.probe_port.probe_streams(&request.input_path).await?;
        let report = self.inspector.inspect(&output)?;
        let summary = render(&report, &source, request.format)?;

        info!(input = %source, streams = report.len(), "Media stream inspection completed");
        Ok(InspectResponse { report, summary })
    }

    /// Summarise an already captured report without running the tool
    pub fn execute_captured(
        &self,
        source: &str,
        text: &str,
        format: OutputFormat,
    ) -> Result<InspectResponse, DomainError> {
        info!(source, "Parsing captured report");
        let report = self.inspector.inspect_text(text)?;
        let summary = render(&report, source, format)?;
        Ok(InspectResponse { report, summary })
    }
}

/// Render a report as text or JSON
pub fn render(report: &Report, source: &str, format: OutputFormat) -> Result<String, DomainError> {
    match format {
        OutputFormat::Json => format_as_json(report, source),
        OutputFormat::Text => Ok(format_as_text(report, source)),
    }
}

fn format_as_json(report: &Report, source: &str) -> Result<String, DomainError> {
    let document = ReportDocument {
        source,
        stream_count: report.len(),
        video_streams: report.video_streams().len(),
        audio_streams: report.audio_streams().len(),
        subtitle_streams: report.subtitle_streams().len(),
        streams: report.summaries(),
    };
    serde_json::to_string_pretty(&document)
        .map_err(|e| DomainError::Config(format!("JSON serialization failed: {}", e)))
}

fn format_as_text(report: &Report, source: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Media Stream Report:");
    let _ = writeln!(output, "  Source: {}", source);
    let _ = writeln!(
        output,
        "  Streams: {} ({} video, {} audio, {} subtitle)",
        report.len(),
        report.video_streams().len(),
        report.audio_streams().len(),
        report.subtitle_streams().len()
    );

    for summary in report.summaries() {
        let _ = writeln!(
            output,
            "\nStream #{} [{}]: {}",
            summary.position,
            summary.kind,
            summary.codec.as_deref().unwrap_or("unknown codec")
        );
        if let Some(description) = &summary.codec_description {
            let _ = writeln!(output, "  Codec: {}", description);
        }
        if let Some(language) = &summary.language {
            let _ = writeln!(output, "  Language: {}", language);
        }
        if let Some(size) = summary.frame_size {
            match &summary.pixel_format {
                Some(pixel_format) => {
                    let _ = writeln!(output, "  Frame size: {} {}", size, pixel_format);
                }
                None => {
                    let _ = writeln!(output, "  Frame size: {}", size);
                }
            }
        }
        if let Some(rate) = summary.frame_rate {
            let _ = writeln!(output, "  Frame rate: {:.2} fps", rate);
        }
        if let Some(bit_rate) = summary.bit_rate {
            let _ = writeln!(output, "  Bit rate: {} bps", bit_rate);
        }
        if let Some(duration) = summary.duration_seconds {
            let _ = writeln!(output, "  Duration: {:.3}s", duration);
        }
        if let Some(frames) = summary.frame_count {
            let _ = writeln!(output, "  Frames: {}", frames);
        }
        for problem in &summary.problems {
            let _ = writeln!(output, "  Problem: {}", problem);
        }
    }

    output
}
