// Domain errors - Error types for the domain layer

use std::path::PathBuf;

use thiserror::Error;

/// Domain-specific error types
///
/// Parse and derivation failures always carry the field name and the raw
/// value that could not be interpreted, so a caller can report the problem
/// without going back to the captured text.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DomainError {
    /// The inspection tool is not installed or cannot be executed
    #[error("Inspection tool not found: {tool} ({reason})")]
    ToolNotFound { tool: String, reason: String },

    /// The inspection tool ran but did not complete successfully
    #[error("Inspection tool {tool} failed: {reason}")]
    InvocationFailed { tool: String, reason: String },

    /// The input path does not name a regular file
    #[error("No such media file: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// A non-delimiter line without a `=` separator
    #[error("Malformed report line {line_number}: {line:?}")]
    MalformedLine { line_number: usize, line: String },

    /// Width or height present but not an integer
    #[error("Non-integer frame size {width:?}x{height:?}")]
    MalformedSize { width: String, height: String },

    /// Frame count field present but not usable
    #[error("Non-integer frame count in {field}: {value:?}")]
    MalformedFrameCount { field: String, value: String },

    /// Duration field present but not numeric
    #[error("Non-numeric duration in {field}: {value:?}")]
    MalformedDuration { field: String, value: String },

    /// Bit rate field present but not an integer
    #[error("Non-integer bit rate in {field}: {value:?}")]
    MalformedBitRate { field: String, value: String },

    /// Rate field absent, empty, or not a valid rational
    #[error("Nothing useful in {field}: {}", value.as_deref().unwrap_or("<absent>"))]
    InvalidFrameRate { field: String, value: Option<String> },

    /// Neither `nb_frames` nor a tag-embedded duration is available
    #[error("Frame count cannot be determined: no nb_frames and no TAG:DURATION")]
    UnknownFrameCount,

    /// A derived rate is zero and cannot be divided by
    #[error("Division by zero: {field} is zero")]
    DivisionByZero { field: String },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O failure while reading captured report text
    #[error("I/O error: {0}")]
    Io(String),
}

impl DomainError {
    /// True for failures raised by the collaborator before any text was parsed
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::ToolNotFound { .. }
                | DomainError::InvocationFailed { .. }
                | DomainError::PathNotFound { .. }
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(error: std::io::Error) -> Self {
        DomainError::Io(error.to_string())
    }
}
