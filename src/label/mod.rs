//! Label records and the line codec for both on-disk label schemas.
//!
//! A session picks one [`LabelSchema`] up front; every record it reads or
//! writes is the matching [`LabelRecord`] variant. Region logic never looks
//! inside a record beyond [`LabelRecord::rect`] and [`LabelRecord::set_rect`],
//! so the rest of the engine stays schema-agnostic.
//!
//! # Example
//!
//! ```
//! use regionlab::label::{LabelCodec, LabelSchema};
//!
//! let codec = LabelCodec::new(LabelSchema::Normalized);
//! let record = codec.decode("0 0.5 0.5 0.25 0.25").unwrap();
//! assert_eq!(codec.encode(&record), "0 0.5 0.5 0.25 0.25");
//! ```

mod corner;
mod file;
mod normalized;

pub use corner::{CornerRecord, MAX_OCCLUDED};
pub use file::{decode_records, encode_records, read_label_file, write_label_file, DecodedLabels};
pub use normalized::NormalizedRecord;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::classes::ClassRef;
use crate::geom::{ImageSize, Rect};

/// Which label encoding a session reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LabelSchema {
    /// Absolute pixel corners plus 3D attributes (15 fields).
    #[value(alias = "kitti")]
    Corner,
    /// Class index plus image-relative center box (5 fields).
    #[value(alias = "yolo")]
    Normalized,
}

impl LabelSchema {
    /// Number of whitespace-separated fields in one record.
    pub const fn field_count(self) -> usize {
        match self {
            LabelSchema::Corner => corner::FIELD_COUNT,
            LabelSchema::Normalized => normalized::FIELD_COUNT,
        }
    }

    /// Dataset root used by live capture when none is configured.
    pub const fn default_capture_root(self) -> &'static str {
        match self {
            LabelSchema::Corner => "./training_data",
            LabelSchema::Normalized => "./yolo_training_data",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LabelSchema::Corner => "corner",
            LabelSchema::Normalized => "normalized",
        }
    }
}

impl fmt::Display for LabelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "corner" | "kitti" => Ok(LabelSchema::Corner),
            "normalized" | "yolo" => Ok(LabelSchema::Normalized),
            other => Err(format!(
                "unknown label schema '{other}' (supported: corner, normalized)"
            )),
        }
    }
}

/// One label record, tagged with its schema.
#[derive(Clone, Debug, PartialEq)]
pub enum LabelRecord {
    Corner(CornerRecord),
    Normalized(NormalizedRecord),
}

impl LabelRecord {
    /// Builds the record for a newly drawn region.
    ///
    /// The corner schema stores the class name, the normalized schema the
    /// class index.
    pub fn new(schema: LabelSchema, class: &ClassRef, rect: Rect, size: ImageSize) -> Self {
        match schema {
            LabelSchema::Corner => LabelRecord::Corner(CornerRecord::from_rect(&class.name, rect)),
            LabelSchema::Normalized => {
                LabelRecord::Normalized(NormalizedRecord::from_rect(class.index, rect, size))
            }
        }
    }

    pub fn schema(&self) -> LabelSchema {
        match self {
            LabelRecord::Corner(_) => LabelSchema::Corner,
            LabelRecord::Normalized(_) => LabelSchema::Normalized,
        }
    }

    /// Pixel-space box described by the record.
    pub fn rect(&self, size: ImageSize) -> Rect {
        match self {
            LabelRecord::Corner(record) => record.rect(),
            LabelRecord::Normalized(record) => record.rect(size),
        }
    }

    /// Recomputes the geometry fields from a pixel-space box.
    pub fn set_rect(&mut self, rect: Rect, size: ImageSize) {
        match self {
            LabelRecord::Corner(record) => record.set_rect(rect),
            LabelRecord::Normalized(record) => record.set_rect(rect, size),
        }
    }

    /// Class index, for schemas that store one.
    pub fn class_index(&self) -> Option<usize> {
        match self {
            LabelRecord::Corner(_) => None,
            LabelRecord::Normalized(record) => Some(record.class_index),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            LabelRecord::Corner(record) => record.encode(),
            LabelRecord::Normalized(record) => record.encode(),
        }
    }
}

impl fmt::Display for LabelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Why a single label line could not be decoded.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LabelParseError {
    #[error("line is empty")]
    Empty,

    #[error("expected {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("expected {expected} fields, found more")]
    TooManyFields { expected: usize },

    #[error("invalid {field} '{value}'; expected {expected}")]
    InvalidField {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("occluded state {0} is outside 0..=3")]
    OccludedOutOfRange(i32),
}

/// Line encoder/decoder for the schema fixed at session configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelCodec {
    schema: LabelSchema,
}

impl LabelCodec {
    pub fn new(schema: LabelSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> LabelSchema {
        self.schema
    }

    /// Decodes one line into a record of the codec's schema.
    pub fn decode(&self, line: &str) -> Result<LabelRecord, LabelParseError> {
        let expected = self.schema.field_count();

        // Take one token past the field count so over-long lines are caught
        // without collecting the whole line.
        let tokens: Vec<&str> = line.split_whitespace().take(expected + 1).collect();

        if tokens.is_empty() {
            return Err(LabelParseError::Empty);
        }
        if tokens.len() < expected {
            return Err(LabelParseError::TooFewFields {
                expected,
                found: tokens.len(),
            });
        }
        if tokens.len() > expected {
            return Err(LabelParseError::TooManyFields { expected });
        }

        match self.schema {
            LabelSchema::Corner => CornerRecord::decode_tokens(&tokens).map(LabelRecord::Corner),
            LabelSchema::Normalized => {
                NormalizedRecord::decode_tokens(&tokens).map(LabelRecord::Normalized)
            }
        }
    }

    /// Encodes one record as a line without the trailing newline.
    pub fn encode(&self, record: &LabelRecord) -> String {
        debug_assert_eq!(record.schema(), self.schema, "label schemas must not mix");
        record.encode()
    }
}

fn parse_f64_field(raw: &str, field: &'static str) -> Result<f64, LabelParseError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LabelParseError::InvalidField {
            field,
            value: raw.to_string(),
            expected: "finite floating-point number",
        }),
    }
}

/// Fuzz-only entrypoint for single-line decoding in both schemas.
#[cfg(feature = "fuzzing")]
pub fn fuzz_decode_line(input: &str) {
    for schema in [LabelSchema::Corner, LabelSchema::Normalized] {
        if let Ok(record) = LabelCodec::new(schema).decode(input) {
            let _ = record.encode();
        }
    }
}
