//! Report segmentation, report construction and input validation

pub mod inspector;
pub mod segmenter;
pub mod validator;

pub use inspector::ReportInspector;
pub use segmenter::{segment, MalformedLinePolicy, Segmenter, STREAM_END, STREAM_START};
pub use validator::MediaValidator;
