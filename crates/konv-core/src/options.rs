//! Conversion options shared by every item of a batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a format or quality name is not one the service accepts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported {what} {value:?} (expected one of: {expected})")]
pub struct UnknownOption {
    what: &'static str,
    value: String,
    expected: &'static str,
}

/// Target audio format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Mp3,
    Wav,
    Ogg,
    Aac,
    Flac,
    M4a,
    Opus,
}

impl Format {
    pub const ALL: [Format; 7] = [
        Format::Mp3,
        Format::Wav,
        Format::Ogg,
        Format::Aac,
        Format::Flac,
        Format::M4a,
        Format::Opus,
    ];

    /// Name sent in the `format` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Mp3 => "mp3",
            Format::Wav => "wav",
            Format::Ogg => "ogg",
            Format::Aac => "aac",
            Format::Flac => "flac",
            Format::M4a => "m4a",
            Format::Opus => "opus",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Format::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOption {
                what: "format",
                value: s.to_string(),
                expected: "mp3, wav, ogg, aac, flac, m4a, opus",
            })
    }
}

/// Quality preset; the service maps each to codec-specific bitrate settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    High,
    #[default]
    Medium,
    Low,
    Podcast,
}

impl Quality {
    pub const ALL: [Quality; 4] = [Quality::High, Quality::Medium, Quality::Low, Quality::Podcast];

    /// Name sent in the `quality` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
            Quality::Podcast => "podcast",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Quality::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownOption {
                what: "quality",
                value: s.to_string(),
                expected: "high, medium, low, podcast",
            })
    }
}

/// Options applied to every item of one batch. Fixed once the batch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOptions {
    pub format: Format,
    pub quality: Quality,
}
