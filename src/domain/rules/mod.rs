// Business rules - Numeric micro-grammars and the duration/frame-count resolver

use std::num::NonZeroU64;

use thiserror::Error;
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::{fields, Stream, StreamKind};

/// Sentinel the inspection tool writes when it cannot determine a value
pub const NOT_AVAILABLE: &str = "N/A";

/// Check a raw value against the "not available" sentinel
pub fn is_not_available(raw: &str) -> bool {
    raw == NOT_AVAILABLE
}

/// Reasons a rate field could not be read
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateParseError {
    #[error("empty value")]
    Empty,
    #[error("denominator is zero")]
    ZeroDenominator,
    #[error("neither N/D nor a decimal number")]
    NotNumeric,
}

/// A parsed rate field.
///
/// Grammar, applied to the whole (trimmed) value:
///
/// ```text
/// rate     := fraction | decimal
/// fraction := digits "/" digits
/// decimal  := any finite, non-negative float literal without "/"
/// ```
///
/// A value containing `/` is only ever read as a fraction; the decimal
/// branch is taken when no `/` is present at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rational {
    /// `numerator/denominator`, denominator never zero
    Fraction {
        numerator: u64,
        denominator: NonZeroU64,
    },
    /// Plain decimal number
    Decimal(f64),
}

impl Rational {
    /// Parse a raw rate value
    pub fn parse(raw: &str) -> Result<Self, RateParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RateParseError::Empty);
        }

        match raw.split_once('/') {
            Some((numerator, denominator)) => {
                let numerator = parse_digits(numerator).ok_or(RateParseError::NotNumeric)?;
                let denominator =
                    parse_digits(denominator).ok_or(RateParseError::NotNumeric)?;
                let denominator =
                    NonZeroU64::new(denominator).ok_or(RateParseError::ZeroDenominator)?;
                Ok(Rational::Fraction {
                    numerator,
                    denominator,
                })
            }
            None => {
                let value: f64 = raw.parse().map_err(|_| RateParseError::NotNumeric)?;
                if !value.is_finite() || value < 0.0 {
                    return Err(RateParseError::NotNumeric);
                }
                Ok(Rational::Decimal(value))
            }
        }
    }

    /// Decimal rate; fractions are rounded to two decimal places
    pub fn to_rate(self) -> f64 {
        match self {
            Rational::Fraction {
                numerator,
                denominator,
            } => round_to_hundredths(numerator as f64 / denominator.get() as f64),
            Rational::Decimal(value) => value,
        }
    }
}

/// Parse `"N"` or `"N/D"` into a decimal rate, e.g. `"30000/1001"` is `29.97`
pub fn parse_rate(raw: &str) -> Result<f64, RateParseError> {
    Rational::parse(raw).map(Rational::to_rate)
}

fn parse_digits(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A `HH:MM:SS.fraction` timestamp as written in the `TAG:DURATION` field,
/// e.g. `00:03:50.070000000`.
///
/// Each component is exactly two digits; the colons are optional. Only the
/// start of the value is matched, trailing text is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagTimestamp<'a> {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Sub-second digits, kept verbatim
    pub fraction: &'a str,
}

impl<'a> TagTimestamp<'a> {
    /// Parse a tag timestamp, `None` when the value does not follow the pattern
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut cursor = Cursor::new(raw);
        let hours = cursor.two_digits()?;
        cursor.eat(b':');
        let minutes = cursor.two_digits()?;
        cursor.eat(b':');
        let seconds = cursor.two_digits()?;
        if !cursor.eat(b'.') {
            return None;
        }
        let fraction = cursor.digits();
        if fraction.is_empty() {
            return None;
        }

        Some(Self {
            hours,
            minutes,
            seconds,
            fraction,
        })
    }

    /// Whole seconds, sub-second digits excluded
    pub fn whole_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

struct Cursor<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    fn peek_digit(&self, offset: usize) -> Option<u32> {
        self.source
            .as_bytes()
            .get(self.position + offset)
            .filter(|b| b.is_ascii_digit())
            .map(|b| u32::from(b - b'0'))
    }

    fn two_digits(&mut self) -> Option<u32> {
        let tens = self.peek_digit(0)?;
        let units = self.peek_digit(1)?;
        self.position += 2;
        Some(tens * 10 + units)
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.source.as_bytes().get(self.position) == Some(&expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn digits(&mut self) -> &'a str {
        let start = self.position;
        while self.peek_digit(0).is_some() {
            self.position += 1;
        }
        &self.source[start..self.position]
    }
}

/// Derives duration and frame count when the direct fields are unavailable
pub struct DurationResolver;

impl DurationResolver {
    /// Frame count of an audio or video stream, `0` for any other kind.
    ///
    /// Order of preference:
    /// 1. `nb_frames` unless it is `N/A`;
    /// 2. whole seconds of `TAG:DURATION` times `r_frame_rate`, truncated;
    /// 3. otherwise [`DomainError::UnknownFrameCount`].
    ///
    /// An absent or empty `TAG:DURATION` counts as missing. A tag that does
    /// not follow the `HH:MM:SS.fraction` pattern is an error, not zero.
    pub fn frame_count(stream: &Stream) -> Result<u64, DomainError> {
        if !Self::applies_to(stream.kind()) {
            return Ok(0);
        }

        if let Some(raw) = stream.get(fields::NB_FRAMES) {
            if !is_not_available(raw) {
                return raw
                    .parse::<u64>()
                    .map_err(|_| DomainError::MalformedFrameCount {
                        field: fields::NB_FRAMES.to_string(),
                        value: raw.to_string(),
                    });
            }
        }

        let tag = match stream.get(fields::TAG_DURATION) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Err(DomainError::UnknownFrameCount),
        };

        let timestamp =
            TagTimestamp::parse(tag).ok_or_else(|| DomainError::MalformedFrameCount {
                field: fields::TAG_DURATION.to_string(),
                value: tag.to_string(),
            })?;
        let fps = stream.r_frame_rate()?;
        let product = (timestamp.whole_seconds() as f64 * fps).floor();
        // The rate is finite and non-negative, so only the upper bound can fail.
        if product >= u64::MAX as f64 {
            return Err(DomainError::InvalidFrameRate {
                field: fields::R_FRAME_RATE.to_string(),
                value: stream.get(fields::R_FRAME_RATE).map(str::to_string),
            });
        }
        let frames = product as u64;

        debug!(
            tag,
            fps,
            frames,
            discarded_fraction = timestamp.fraction,
            "Frame count derived from tag duration"
        );
        Ok(frames)
    }

    /// Duration in seconds of an audio or video stream, `0.0` for any other kind.
    ///
    /// Uses `duration` unless it is `N/A` or absent, in which case the
    /// result is the frame count divided by `avg_frame_rate`.
    pub fn duration_seconds(stream: &Stream) -> Result<f64, DomainError> {
        if !Self::applies_to(stream.kind()) {
            return Ok(0.0);
        }

        if let Some(raw) = stream.get(fields::DURATION) {
            if !is_not_available(raw) {
                return raw
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| DomainError::MalformedDuration {
                        field: fields::DURATION.to_string(),
                        value: raw.to_string(),
                    });
            }
        }

        let fps = stream.average_frame_rate()?;
        if fps == 0.0 {
            return Err(DomainError::DivisionByZero {
                field: fields::AVG_FRAME_RATE.to_string(),
            });
        }
        let frames = Self::frame_count(stream)?;

        debug!(frames, fps, "Duration derived from frame count");
        Ok(frames as f64 / fps)
    }

    fn applies_to(kind: StreamKind) -> bool {
        matches!(kind, StreamKind::Audio | StreamKind::Video)
    }
}
