//! User-facing time and volume values
//!
//! Both kinds are parsed from short strings (`"5s"`, `"250 ms"`, `"33.3%"`,
//! `"12000"`) and resolved into the sample domain once the format of the file
//! is known. Resolution happens exactly once per scan; the detectors only ever
//! see plain integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a time or volume string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Empty value")]
    Empty,

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Negative values are not allowed: {0}")]
    Negative(String),

    #[error("Unknown time unit: {0}")]
    UnknownUnit(String),
}

/// A duration expressed in samples, seconds or milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeValue {
    Samples(u64),
    Seconds(f64),
    Milliseconds(f64),
}

impl TimeValue {
    /// Convert to a sample count at the given sample rate
    ///
    /// Seconds are rounded to the nearest sample, milliseconds are floored.
    pub fn to_samples(self, sample_rate: u32) -> u64 {
        let rate = f64::from(sample_rate);
        match self {
            Self::Samples(n) => n,
            Self::Seconds(s) => (s * rate).round() as u64,
            Self::Milliseconds(ms) => (ms * rate / 1000.0).floor() as u64,
        }
    }
}

impl FromStr for TimeValue {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UnitError::Empty);
        }
        if s.starts_with('-') {
            return Err(UnitError::Negative(s.to_string()));
        }

        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        if number.is_empty() {
            return Err(UnitError::InvalidNumber(s.to_string()));
        }

        match unit.trim().to_ascii_lowercase().as_str() {
            "" | "samp" | "sample" | "samples" => number
                .parse::<u64>()
                .map(Self::Samples)
                .map_err(|_| UnitError::InvalidNumber(number.to_string())),
            "ms" | "msec" | "millisecond" | "milliseconds" => {
                parse_magnitude(number).map(Self::Milliseconds)
            }
            "s" | "sec" | "second" | "seconds" => parse_magnitude(number).map(Self::Seconds),
            other => Err(UnitError::UnknownUnit(other.to_string())),
        }
    }
}

impl TryFrom<String> for TimeValue {
    type Error = UnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeValue> for String {
    fn from(value: TimeValue) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Samples(n) => write!(f, "{}", n),
            Self::Seconds(s) => write!(f, "{}s", s),
            Self::Milliseconds(ms) => write!(f, "{}ms", ms),
        }
    }
}

/// An amplitude threshold, either relative to full scale or absolute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Volume {
    /// Fraction of the format's maximum value (1.0 = full scale)
    Ratio(f64),
    /// Raw sample magnitude
    Absolute(i64),
}

impl Volume {
    /// Resolve against the full-scale value of the current format
    ///
    /// No clamping: ratios above 1.0 give thresholds no sample can reach.
    pub fn to_absolute(self, max_value: i64) -> i64 {
        match self {
            Self::Ratio(ratio) => (ratio * max_value as f64).floor() as i64,
            Self::Absolute(value) => value,
        }
    }
}

impl FromStr for Volume {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UnitError::Empty);
        }
        if s.starts_with('-') {
            return Err(UnitError::Negative(s.to_string()));
        }

        if let Some(percent) = s.strip_suffix('%') {
            let percent = parse_magnitude(percent.trim_end())?;
            Ok(Self::Ratio(percent / 100.0))
        } else if s.contains('.') {
            parse_magnitude(s).map(Self::Ratio)
        } else {
            s.parse::<i64>()
                .map(Self::Absolute)
                .map_err(|_| UnitError::InvalidNumber(s.to_string()))
        }
    }
}

impl TryFrom<String> for Volume {
    type Error = UnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Volume> for String {
    fn from(value: Volume) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // a fraction without '.' would read back as an absolute value
            Self::Ratio(ratio) if ratio.fract() == 0.0 => write!(f, "{}.0", ratio),
            Self::Ratio(ratio) => write!(f, "{}", ratio),
            Self::Absolute(value) => write!(f, "{}", value),
        }
    }
}

fn parse_magnitude(number: &str) -> Result<f64, UnitError> {
    let value: f64 = number
        .parse()
        .map_err(|_| UnitError::InvalidNumber(number.to_string()))?;
    if !value.is_finite() {
        return Err(UnitError::InvalidNumber(number.to_string()));
    }
    if value < 0.0 {
        return Err(UnitError::Negative(number.to_string()));
    }
    Ok(value)
}

/// Full-scale value for a signed sample of the given width: `2^(bits-1) - 1`
pub fn max_value(bits_per_sample: u16) -> i64 {
    match bits_per_sample {
        0 => 0,
        bits => (1_i64 << (u32::from(bits.min(63)) - 1)) - 1,
    }
}
