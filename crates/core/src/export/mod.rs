//! Tracklet serialization.
//!
//! Every format emits the same per-box field set, keyed by a zero-based
//! tracklet id equal to the tracklet's position in the input slice:
//!
//! | field    | text            | xml                | json              | matlab           | pickle     |
//! |----------|-----------------|--------------------|-------------------|------------------|------------|
//! | id       | column 1        | `track@id`         | object key        | `id`             | position   |
//! | label    | column 9, quoted| `track@label`      | `label`           | `label`          | `label`    |
//! | frame    | column 6        | `box@frame`        | `boxes` key       | `frame`          | `frame`    |
//! | lost     | column 7, `1/0` | `box@outside`, `1/0` | `outside`, bool | `lost`, logical  | `lost`     |
//! | occluded | column 8, `1/0` | `box@occluded`, `1/0`| `occluded`, bool| `occluded`, logical | `occluded` |
//!
//! `lost` is renamed to `outside` in XML and JSON only. Exporters never
//! interpolate; callers pass raw or interpolated tracklets as they see fit.

mod json;
mod matlab;
mod pickle;
mod text;
mod xml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::tracklet::Tracklet;

pub use json::{JsonBox, JsonDocument, JsonExporter, JsonTrack};
pub use matlab::{MatlabExporter, MATLAB_VARIABLE_NAME};
pub use pickle::{PickleExporter, PickleTrack};
pub use text::TextExporter;
pub use xml::XmlExporter;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for tracklet serialization.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML encoding failed: {0}")]
    Xml(String),

    #[error("pickle encoding failed: {0}")]
    Pickle(#[from] serde_pickle::Error),

    #[error("MAT-file encoding failed: {0}")]
    Matlab(String),
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// Supported output encodings. Plain text is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Text,
    Xml,
    Json,
    Matlab,
    Pickle,
}

const VALID_FORMAT_STRINGS: &[&str] = &["text", "xml", "json", "matlab", "pickle"];

impl ExportFormat {
    /// Every format, in declaration order.
    pub const ALL: [ExportFormat; 5] = [
        Self::Text,
        Self::Xml,
        Self::Json,
        Self::Matlab,
        Self::Pickle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Matlab => "matlab",
            Self::Pickle => "pickle",
        }
    }

    /// Whether the encoding is binary (unsafe to print to a terminal).
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Matlab | Self::Pickle)
    }

    /// The exporter implementing this format.
    pub fn exporter(&self) -> &'static dyn Exporter {
        match self {
            Self::Text => &TextExporter,
            Self::Xml => &XmlExporter,
            Self::Json => &JsonExporter,
            Self::Matlab => &MatlabExporter,
            Self::Pickle => &PickleExporter,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            "matlab" => Ok(Self::Matlab),
            "pickle" => Ok(Self::Pickle),
            _ => Err(CoreError::Validation(format!(
                "Invalid export format '{s}'. Must be one of: {}",
                VALID_FORMAT_STRINGS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Exporter trait
// ---------------------------------------------------------------------------

/// Serializes a tracklet list into one output encoding.
pub trait Exporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// Write the encoded tracklets to `sink`. Sink errors are returned as-is
    /// and may leave a partial document behind.
    fn serialize(&self, tracklets: &[Tracklet], sink: &mut dyn Write) -> Result<(), ExportError>;
}

/// Encode `tracklets` into an in-memory buffer.
pub fn export(tracklets: &[Tracklet], format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    format.exporter().serialize(tracklets, &mut buf)?;
    Ok(buf)
}

/// Encode `tracklets` straight into `sink`.
pub fn export_to(
    tracklets: &[Tracklet],
    format: ExportFormat,
    sink: &mut dyn Write,
) -> Result<(), ExportError> {
    format.exporter().serialize(tracklets, sink)
}

/// `1` / `0` rendering of a flag in the text-based formats.
fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
