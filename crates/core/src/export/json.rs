//! JSON: tracklets keyed by id, boxes keyed by frame.

use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

use super::{ExportError, ExportFormat, Exporter};
use crate::bbox::FrameBox;
use crate::tracklet::Tracklet;

/// Box fields as written to JSON. `lost` is renamed to `outside`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsonBox {
    pub xtl: f64,
    pub ytl: f64,
    pub xbr: f64,
    pub ybr: f64,
    pub outside: bool,
    pub occluded: bool,
}

impl From<&FrameBox> for JsonBox {
    fn from(b: &FrameBox) -> Self {
        Self {
            xtl: b.xtl,
            ytl: b.ytl,
            xbr: b.xbr,
            ybr: b.ybr,
            outside: b.lost,
            occluded: b.occluded,
        }
    }
}

/// One tracklet. Boxes sharing a frame collapse to the last one written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonTrack {
    pub label: String,
    pub boxes: BTreeMap<i32, JsonBox>,
}

/// Whole document, keyed by zero-based tracklet id.
pub type JsonDocument = BTreeMap<usize, JsonTrack>;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    /// Build the document without encoding it.
    pub fn document(tracklets: &[Tracklet]) -> JsonDocument {
        tracklets
            .iter()
            .enumerate()
            .map(|(id, track)| {
                let mut boxes = BTreeMap::new();
                for b in &track.boxes {
                    boxes.insert(b.frame, JsonBox::from(b));
                }
                let track = JsonTrack {
                    label: track.label.clone(),
                    boxes,
                };
                (id, track)
            })
            .collect()
    }
}

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn serialize(&self, tracklets: &[Tracklet], sink: &mut dyn Write) -> Result<(), ExportError> {
        serde_json::to_writer(&mut *sink, &Self::document(tracklets))?;
        sink.write_all(b"\n")?;
        Ok(())
    }
}
