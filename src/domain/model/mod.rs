// Domain models - Field stores, streams and the report that owns them

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::rules::{self, is_not_available, DurationResolver};

/// Well-known field names of a stream block
pub mod fields {
    pub const CODEC_TYPE: &str = "codec_type";
    pub const CODEC_NAME: &str = "codec_name";
    pub const CODEC_LONG_NAME: &str = "codec_long_name";
    pub const CODEC_TAG_STRING: &str = "codec_tag_string";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const PIX_FMT: &str = "pix_fmt";
    pub const DURATION: &str = "duration";
    pub const NB_FRAMES: &str = "nb_frames";
    pub const BIT_RATE: &str = "bit_rate";
    pub const R_FRAME_RATE: &str = "r_frame_rate";
    pub const AVG_FRAME_RATE: &str = "avg_frame_rate";
    pub const TAG_LANGUAGE: &str = "TAG:language";
    pub const TAG_DURATION: &str = "TAG:DURATION";
}

/// Presence of a single field in a [`FieldStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    /// The key never appeared in the block
    Absent,
    /// The key appeared with nothing after `=`
    Empty,
    /// The key appeared with a non-empty value
    Value(&'a str),
}

impl<'a> Field<'a> {
    /// Non-empty value, if any
    pub fn value(self) -> Option<&'a str> {
        match self {
            Field::Value(value) => Some(value),
            Field::Absent | Field::Empty => None,
        }
    }

    /// Non-empty value other than the `N/A` sentinel
    pub fn available(self) -> Option<&'a str> {
        self.value().filter(|value| !is_not_available(value))
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_not_available(self) -> bool {
        matches!(self, Field::Value(value) if is_not_available(value))
    }
}

/// Ordered `key=value` pairs of one `[STREAM]...[/STREAM]` block.
///
/// Values are kept as raw strings. A repeated key keeps its first position
/// and its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStore {
    entries: Vec<(String, String)>,
    // key -> position in `entries`
    index: HashMap<String, usize>,
}

impl FieldStore {
    /// Create an empty field store
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Raw value for a key, `Some("")` for an empty value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .and_then(|&position| self.entries.get(position))
            .map(|(_, value)| value.as_str())
    }

    /// Tri-state presence of a key
    pub fn field(&self, key: &str) -> Field<'_> {
        match self.get(key) {
            None => Field::Absent,
            Some("") => Field::Empty,
            Some(value) => Field::Value(value),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = FieldStore::new();
        for (key, value) in iter {
            store.insert(key, value);
        }
        store
    }
}

/// Stream classification derived from `codec_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Audio,
    Video,
    Subtitle,
    Other,
}

impl StreamKind {
    /// Classify a raw `codec_type` value; anything unrecognised is `Other`
    pub fn from_codec_type(codec_type: Option<&str>) -> Self {
        match codec_type {
            Some("audio") => StreamKind::Audio,
            Some("video") => StreamKind::Video,
            Some("subtitle") => StreamKind::Subtitle,
            _ => StreamKind::Other,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamKind::Audio => "audio",
            StreamKind::Video => "video",
            StreamKind::Subtitle => "subtitle",
            StreamKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Pixel dimensions of a video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One stream of a report.
///
/// Every accessor recomputes from the field store; nothing is cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    fields: FieldStore,
}

impl Stream {
    /// Wrap a field store
    pub fn new(fields: FieldStore) -> Self {
        Self { fields }
    }

    /// Underlying field store
    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    /// Raw value of any field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    /// Classification from `codec_type`
    pub fn kind(&self) -> StreamKind {
        StreamKind::from_codec_type(self.get(fields::CODEC_TYPE))
    }

    pub fn is_audio(&self) -> bool {
        self.kind() == StreamKind::Audio
    }

    pub fn is_video(&self) -> bool {
        self.kind() == StreamKind::Video
    }

    pub fn is_subtitle(&self) -> bool {
        self.kind() == StreamKind::Subtitle
    }

    /// Frame size of a video stream.
    ///
    /// `None` for non-video streams, and when `width` or `height` is absent,
    /// empty or `N/A`. Never parses anything for non-video streams.
    pub fn frame_size(&self) -> Result<Option<FrameSize>, DomainError> {
        if !self.is_video() {
            return Ok(None);
        }

        let width = self.fields.field(fields::WIDTH).available();
        let height = self.fields.field(fields::HEIGHT).available();
        let (Some(width), Some(height)) = (width, height) else {
            return Ok(None);
        };

        match (width.parse::<u32>(), height.parse::<u32>()) {
            (Ok(width), Ok(height)) => Ok(Some(FrameSize { width, height })),
            _ => Err(DomainError::MalformedSize {
                width: width.to_string(),
                height: height.to_string(),
            }),
        }
    }

    /// `pix_fmt` of a video stream, verbatim
    pub fn pixel_format(&self) -> Option<&str> {
        if !self.is_video() {
            return None;
        }
        self.fields.field(fields::PIX_FMT).value()
    }

    /// Language tag, e.g. `eng`
    pub fn language(&self) -> Option<&str> {
        self.fields.field(fields::TAG_LANGUAGE).value()
    }

    /// Short codec name, e.g. `h264`
    pub fn codec(&self) -> Option<&str> {
        self.fields.field(fields::CODEC_NAME).value()
    }

    /// Long codec name
    pub fn codec_description(&self) -> Option<&str> {
        self.fields.field(fields::CODEC_LONG_NAME).value()
    }

    /// Codec tag, e.g. `avc1`
    pub fn codec_tag(&self) -> Option<&str> {
        self.fields.field(fields::CODEC_TAG_STRING).value()
    }

    /// Bit rate in bits per second; absent, empty and `N/A` are all `None`
    pub fn bit_rate(&self) -> Result<Option<u64>, DomainError> {
        match self.fields.field(fields::BIT_RATE).available() {
            None => Ok(None),
            Some(raw) => raw
                .parse::<u64>()
                .map(Some)
                .map_err(|_| DomainError::MalformedBitRate {
                    field: fields::BIT_RATE.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    /// Real base frame rate from `r_frame_rate`
    pub fn r_frame_rate(&self) -> Result<f64, DomainError> {
        self.rate(fields::R_FRAME_RATE)
    }

    /// Average frame rate from `avg_frame_rate`
    pub fn average_frame_rate(&self) -> Result<f64, DomainError> {
        self.rate(fields::AVG_FRAME_RATE)
    }

    /// Frame count, see [`DurationResolver::frame_count`]
    pub fn frame_count(&self) -> Result<u64, DomainError> {
        DurationResolver::frame_count(self)
    }

    /// Duration in seconds, see [`DurationResolver::duration_seconds`]
    pub fn duration_seconds(&self) -> Result<f64, DomainError> {
        DurationResolver::duration_seconds(self)
    }

    fn rate(&self, field: &str) -> Result<f64, DomainError> {
        let raw = self.get(field);
        rules::parse_rate(raw.unwrap_or_default()).map_err(|_| DomainError::InvalidFrameRate {
            field: field.to_string(),
            value: raw.map(str::to_string),
        })
    }
}

/// All streams of one captured report, in order of appearance.
///
/// The per-kind views are computed once at construction. Construction
/// cannot fail: partitioning only needs the classification, which is total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    streams: Vec<Stream>,
    video: Vec<usize>,
    audio: Vec<usize>,
    subtitle: Vec<usize>,
}

impl Report {
    /// Build a report and its per-kind views
    pub fn new(streams: Vec<Stream>) -> Self {
        let mut video = Vec::new();
        let mut audio = Vec::new();
        let mut subtitle = Vec::new();

        for (position, stream) in streams.iter().enumerate() {
            match stream.kind() {
                StreamKind::Video => video.push(position),
                StreamKind::Audio => audio.push(position),
                StreamKind::Subtitle => subtitle.push(position),
                StreamKind::Other => {}
            }
        }

        Self {
            streams,
            video,
            audio,
            subtitle,
        }
    }

    /// Build a report from segmented blocks
    pub fn from_field_stores(stores: impl IntoIterator<Item = FieldStore>) -> Self {
        Self::new(stores.into_iter().map(Stream::new).collect())
    }

    /// All streams
    pub fn streams(&self) -> &[Stream] {
        &self.streams
    }

    pub fn video_streams(&self) -> Vec<&Stream> {
        self.view(&self.video)
    }

    pub fn audio_streams(&self) -> Vec<&Stream> {
        self.view(&self.audio)
    }

    pub fn subtitle_streams(&self) -> Vec<&Stream> {
        self.view(&self.subtitle)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Evaluate every accessor of every stream.
    ///
    /// A failing accessor leaves its summary field empty and records the
    /// error in that stream's `problems`; other streams are unaffected.
    pub fn summaries(&self) -> Vec<StreamSummary> {
        self.streams
            .iter()
            .enumerate()
            .map(|(position, stream)| StreamSummary::from_stream(position, stream))
            .collect()
    }

    fn view(&self, positions: &[usize]) -> Vec<&Stream> {
        positions
            .iter()
            .filter_map(|&position| self.streams.get(position))
            .collect()
    }
}

/// Serialisable snapshot of one stream's derived facts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamSummary {
    pub position: usize,
    pub kind: StreamKind,
    pub codec: Option<String>,
    pub codec_description: Option<String>,
    pub codec_tag: Option<String>,
    pub language: Option<String>,
    pub frame_size: Option<FrameSize>,
    pub pixel_format: Option<String>,
    pub bit_rate: Option<u64>,
    pub frame_rate: Option<f64>,
    pub average_frame_rate: Option<f64>,
    pub duration_seconds: Option<f64>,
    pub frame_count: Option<u64>,
    pub problems: Vec<String>,
}

impl StreamSummary {
    /// Summarise a stream; frame rates are only evaluated for video, duration
    /// and frame count for audio and video
    pub fn from_stream(position: usize, stream: &Stream) -> Self {
        let kind = stream.kind();
        let mut problems = Vec::new();
        let timed = matches!(kind, StreamKind::Audio | StreamKind::Video);
        let video = kind == StreamKind::Video;

        let frame_size = record(stream.frame_size(), &mut problems).flatten();
        let bit_rate = record(stream.bit_rate(), &mut problems).flatten();
        let frame_rate = video
            .then(|| record(stream.r_frame_rate(), &mut problems))
            .flatten();
        let average_frame_rate = video
            .then(|| record(stream.average_frame_rate(), &mut problems))
            .flatten();
        let frame_count = timed
            .then(|| record(stream.frame_count(), &mut problems))
            .flatten();
        let duration_seconds = timed
            .then(|| record(stream.duration_seconds(), &mut problems))
            .flatten();

        Self {
            position,
            kind,
            codec: stream.codec().map(str::to_string),
            codec_description: stream.codec_description().map(str::to_string),
            codec_tag: stream.codec_tag().map(str::to_string),
            language: stream.language().map(str::to_string),
            frame_size,
            pixel_format: stream.pixel_format().map(str::to_string),
            bit_rate,
            frame_rate,
            average_frame_rate,
            duration_seconds,
            frame_count,
            problems,
        }
    }
}

fn record<T>(result: Result<T, DomainError>, problems: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            let message = error.to_string();
            if !problems.contains(&message) {
                problems.push(message);
            }
            None
        }
    }
}
