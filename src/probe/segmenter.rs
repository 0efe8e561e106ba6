//! Block segmentation of the inspection tool's text report
//!
//! The report is a flat sequence of lines. Stream blocks open with a line
//! that is exactly `[STREAM]` and close with one that is exactly
//! `[/STREAM]`; everything else is `key=value`. Trailing line terminators
//! are ignored when matching markers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::FieldStore;

/// Start-of-block marker
pub const STREAM_START: &str = "[STREAM]";
/// End-of-block marker
pub const STREAM_END: &str = "[/STREAM]";

/// What to do with a non-empty, non-marker line that has no `=`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Log and ignore the line
    #[default]
    Skip,
    /// Abort segmentation with [`DomainError::MalformedLine`]
    Fail,
}

impl FromStr for MalformedLinePolicy {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "skip" => Ok(MalformedLinePolicy::Skip),
            "fail" => Ok(MalformedLinePolicy::Fail),
            other => Err(DomainError::Config(format!(
                "Invalid malformed line policy: {}. Valid policies: skip, fail",
                other
            ))),
        }
    }
}

/// Incremental scanner turning report lines into field stores.
///
/// Feed lines with [`Segmenter::push_line`]; a completed block is returned
/// as soon as its end marker is seen. [`Segmenter::finish`] drops any block
/// still open at the end of input.
#[derive(Debug, Default)]
pub struct Segmenter {
    policy: MalformedLinePolicy,
    pending: FieldStore,
    in_block: bool,
    line_number: usize,
}

impl Segmenter {
    /// Create a segmenter with the given malformed-line policy
    pub fn new(policy: MalformedLinePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Consume one line, returning a field store when a block closes
    pub fn push_line(&mut self, line: &str) -> Result<Option<FieldStore>, DomainError> {
        self.line_number += 1;
        let line = line.trim_end_matches(['\r', '\n']);

        if line == STREAM_START {
            if self.in_block {
                debug!(line = self.line_number, "Block restarted before its end marker");
            }
            self.pending = FieldStore::new();
            self.in_block = true;
            return Ok(None);
        }

        if line == STREAM_END {
            self.in_block = false;
            return Ok(Some(std::mem::take(&mut self.pending)));
        }

        if line.trim().is_empty() {
            return Ok(None);
        }

        match line.split_once('=') {
            Some((key, value)) => {
                self.pending.insert(key.trim(), value.trim());
                Ok(None)
            }
            None => self.malformed(line),
        }
    }

    /// End of input; an unterminated block is discarded
    pub fn finish(self) {
        if self.in_block {
            debug!(
                fields = self.pending.len(),
                "Discarding unterminated stream block at end of input"
            );
        }
    }

    fn malformed(&mut self, line: &str) -> Result<Option<FieldStore>, DomainError> {
        match self.policy {
            MalformedLinePolicy::Fail => Err(DomainError::MalformedLine {
                line_number: self.line_number,
                line: line.to_string(),
            }),
            MalformedLinePolicy::Skip => {
                if self.in_block {
                    warn!(line = self.line_number, text = line, "Skipping malformed line");
                } else {
                    trace!(line = self.line_number, text = line, "Skipping text outside a block");
                }
                Ok(None)
            }
        }
    }
}

/// Segment a complete line sequence into one field store per closed block
pub fn segment<I, S>(lines: I, policy: MalformedLinePolicy) -> Result<Vec<FieldStore>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segmenter = Segmenter::new(policy);
    let mut blocks = Vec::new();

    for line in lines {
        if let Some(block) = segmenter.push_line(line.as_ref())? {
            blocks.push(block);
        }
    }
    segmenter.finish();

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
[STREAM]
index=0
codec_name=h264
codec_type=video
width=1920
height=1080
[/STREAM]
[STREAM]
index=1
codec_type=audio
TAG:language=eng
[/STREAM]
";

    #[test]
    fn test_segment_counts_closed_blocks() {
        let blocks = segment(REPORT.lines(), MalformedLinePolicy::Skip).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].get("codec_name"), Some("h264"));
        assert_eq!(blocks[1].get("TAG:language"), Some("eng"));
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let text = format!("{}[STREAM]\ncodec_type=video\n", REPORT);
        let blocks = segment(text.lines(), MalformedLinePolicy::Skip).unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_start_marker_resets_pending_pairs() {
        let lines = ["codec_type=audio", "[STREAM]", "index=3", "[/STREAM]"];
        let blocks = segment(lines, MalformedLinePolicy::Skip).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].get("codec_type"), None);
        assert_eq!(blocks[0].get("index"), Some("3"));
    }

    #[test]
    fn test_split_on_first_equals_and_trim() {
        let lines = ["[STREAM]", "  TAG:title = a=b  ", "empty=", "[/STREAM]"];
        let blocks = segment(lines, MalformedLinePolicy::Fail).unwrap();
        assert_eq!(blocks[0].get("TAG:title"), Some("a=b"));
        assert_eq!(blocks[0].get("empty"), Some(""));
    }

    #[test]
    fn test_markers_with_line_terminators() {
        let lines = ["[STREAM]\r\n", "codec_type=video\n", "[/STREAM]\r\n"];
        let blocks = segment(lines, MalformedLinePolicy::Fail).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].get("codec_type"), Some("video"));
    }

    #[test]
    fn test_malformed_line_policy() {
        let lines = ["[STREAM]", "codec_type=video", "no separator here", "[/STREAM]"];

        let blocks = segment(lines, MalformedLinePolicy::Skip).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len(), 1);

        let error = segment(lines, MalformedLinePolicy::Fail).unwrap_err();
        assert_eq!(
            error,
            DomainError::MalformedLine {
                line_number: 3,
                line: "no separator here".to_string(),
            }
        );
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let lines = ["", "[STREAM]", "   ", "index=0", "[/STREAM]", ""];
        let blocks = segment(lines, MalformedLinePolicy::Fail).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len(), 1);
    }

    #[test]
    fn test_incremental_push() {
        let mut segmenter = Segmenter::new(MalformedLinePolicy::Skip);
        assert_eq!(segmenter.push_line("[STREAM]").unwrap(), None);
        assert_eq!(segmenter.push_line("index=0").unwrap(), None);
        let block = segmenter.push_line("[/STREAM]").unwrap().unwrap();
        assert_eq!(block.get("index"), Some("0"));
        segmenter.finish();
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("skip".parse::<MalformedLinePolicy>().unwrap(), MalformedLinePolicy::Skip);
        assert_eq!("FAIL".parse::<MalformedLinePolicy>().unwrap(), MalformedLinePolicy::Fail);
        assert!("ignore".parse::<MalformedLinePolicy>().is_err());
    }
}
