//! Plain text: one line per box.
//!
//! Flags are the integers `1` and `0`, never the words `True`/`False`.

use std::io::Write;

use super::{flag, ExportError, ExportFormat, Exporter};
use crate::tracklet::Tracklet;

/// Writes `id xtl ytl xbr ybr frame lost occluded "label"` per box.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextExporter;

impl Exporter for TextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn serialize(&self, tracklets: &[Tracklet], sink: &mut dyn Write) -> Result<(), ExportError> {
        for (id, track) in tracklets.iter().enumerate() {
            for b in &track.boxes {
                writeln!(
                    sink,
                    "{id} {} {} {} {} {} {} {} \"{}\"",
                    b.xtl,
                    b.ytl,
                    b.xbr,
                    b.ybr,
                    b.frame,
                    flag(b.lost),
                    flag(b.occluded),
                    track.label,
                )?;
            }
        }
        Ok(())
    }
}
