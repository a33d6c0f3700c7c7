use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use super::error::RecordError;
use super::writers::{
    B8Writer, DetsWriter, HitsWriter, Ptb64Writer, R8Writer, RecordWriter, TextWriter,
};

/// Physical layout of incoming samples, as seen by the batch writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleLayout {
    /// One writer per shot; bulk input must be transposed into per-shot runs.
    Serial,
    /// One writer per 64 shots; each sample of a writer is 8 bytes copied verbatim.
    TransposedPacked64,
}

impl SampleLayout {
    /// Number of shots carried by one writer.
    pub fn shots_per_writer(self) -> usize {
        match self {
            SampleLayout::Serial => 1,
            SampleLayout::TransposedPacked64 => 64,
        }
    }
}

/// Concrete per-stream encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleFormat {
    /// ASCII `0`/`1` per sample, newline-terminated
    #[default]
    Text01,
    /// Bits packed least-significant first, 8 per byte
    B8,
    /// Run lengths of zeros between ones, one byte each
    R8,
    /// Comma-separated indices of set samples, newline-terminated
    Hits,
    /// `shot` followed by typed indices of set samples, newline-terminated
    Dets,
    /// 64 shots per writer, 8 bytes per sample, blocks of 64 samples
    Ptb64,
}

impl SampleFormat {
    /// Every supported format, in declaration order.
    pub const ALL: [SampleFormat; 6] = [
        SampleFormat::Text01,
        SampleFormat::B8,
        SampleFormat::R8,
        SampleFormat::Hits,
        SampleFormat::Dets,
        SampleFormat::Ptb64,
    ];

    /// The fan-out layout this encoding needs.
    pub fn layout(self) -> SampleLayout {
        match self {
            SampleFormat::Ptb64 => SampleLayout::TransposedPacked64,
            _ => SampleLayout::Serial,
        }
    }

    /// Short name used in config files.
    pub fn name(self) -> &'static str {
        match self {
            SampleFormat::Text01 => "01",
            SampleFormat::B8 => "b8",
            SampleFormat::R8 => "r8",
            SampleFormat::Hits => "hits",
            SampleFormat::Dets => "dets",
            SampleFormat::Ptb64 => "ptb64",
        }
    }

    /// Build a record writer for this format on top of `out`.
    pub fn writer<'a, W: Write + 'a>(self, out: W) -> Box<dyn RecordWriter<W> + 'a> {
        match self {
            SampleFormat::Text01 => Box::new(TextWriter::new(out)),
            SampleFormat::B8 => Box::new(B8Writer::new(out)),
            SampleFormat::R8 => Box::new(R8Writer::new(out)),
            SampleFormat::Hits => Box::new(HitsWriter::new(out)),
            SampleFormat::Dets => Box::new(DetsWriter::new(out)),
            SampleFormat::Ptb64 => Box::new(Ptb64Writer::new(out)),
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleFormat {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        SampleFormat::ALL
            .into_iter()
            .find(|format| format.name() == lowered)
            .ok_or_else(|| RecordError::UnknownFormat(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for SampleFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Section tag passed through `begin_result_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultType {
    /// Measurement results (`M`)
    #[default]
    Measurement,
    /// Detection event results (`D`)
    Detector,
    /// Logical observable results (`L`)
    Observable,
}

impl ResultType {
    /// The single-character prefix used in text encodings.
    pub fn as_char(self) -> char {
        match self {
            ResultType::Measurement => 'M',
            ResultType::Detector => 'D',
            ResultType::Observable => 'L',
        }
    }
}

impl TryFrom<char> for ResultType {
    type Error = RecordError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'M' => Ok(ResultType::Measurement),
            'D' => Ok(ResultType::Detector),
            'L' => Ok(ResultType::Observable),
            other => Err(RecordError::UnknownResultType(other)),
        }
    }
}
