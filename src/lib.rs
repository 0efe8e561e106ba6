//! streamprobe library
//!
//! Turns the line-oriented stream report of `ffprobe -show_streams` into
//! typed per-stream records, and derives duration and frame count when the
//! report does not state them directly.
//!
//! ```
//! use streamprobe::{MalformedLinePolicy, ReportInspector};
//!
//! let text = "[STREAM]\ncodec_type=video\nnb_frames=N/A\nr_frame_rate=25/1\n\
//!             TAG:DURATION=00:03:50.070000000\n[/STREAM]\n";
//! let report = ReportInspector::new(MalformedLinePolicy::Skip).inspect_text(text)?;
//! assert_eq!(report.video_streams()[0].frame_count()?, 5750);
//! # Ok::<(), streamprobe::DomainError>(())
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod ports;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{Field, FieldStore, FrameSize, Report, Stream, StreamKind, StreamSummary};
pub use domain::rules::{parse_rate, DurationResolver, Rational, RateParseError, TagTimestamp};
pub use ports::{ProbeOutput, ProbePort};
pub use probe::{segment, MalformedLinePolicy, ReportInspector, Segmenter};
