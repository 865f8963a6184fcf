//! Python pickle (protocol 2): a list of `{label, boxes}` dicts.

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_pickle::SerOptions;

use super::{ExportError, ExportFormat, Exporter};
use crate::bbox::FrameBox;
use crate::tracklet::Tracklet;

/// One pickled tracklet. Boxes keep every [`FrameBox`] field, in frame order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickleTrack {
    pub label: String,
    pub boxes: Vec<FrameBox>,
}

#[derive(Serialize)]
struct PickleTrackRef<'a> {
    label: &'a str,
    boxes: &'a [FrameBox],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PickleExporter;

impl Exporter for PickleExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pickle
    }

    fn serialize(&self, tracklets: &[Tracklet], sink: &mut dyn Write) -> Result<(), ExportError> {
        let records: Vec<PickleTrackRef<'_>> = tracklets
            .iter()
            .map(|t| PickleTrackRef {
                label: &t.label,
                boxes: &t.boxes,
            })
            .collect();
        let bytes = serde_pickle::to_vec(&records, SerOptions::new().proto_v2())?;
        sink.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_pickle::DeOptions;

    fn render(tracklets: &[Tracklet]) -> Vec<u8> {
        let mut buf = Vec::new();
        PickleExporter.serialize(tracklets, &mut buf).unwrap();
        buf
    }

    #[test]
    fn writes_protocol_two_header() {
        let bytes = render(&[]);
        assert_eq!(&bytes[..2], &[0x80, 0x02]);
        let decoded: Vec<PickleTrack> = serde_pickle::from_slice(&bytes, DeOptions::new()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn decodes_to_full_box_records() {
        let boxes = vec![
            FrameBox::new(0, 1.0, 2.0, 3.0, 4.0),
            FrameBox::new(7, 5.0, 6.0, 7.0, 8.0).with_lost(true).with_occluded(true),
        ];
        let tracklets = vec![
            Tracklet::new("car", boxes.clone(), ["w1"]),
            Tracklet::new("person", vec![], ["w2"]),
        ];

        let decoded: Vec<PickleTrack> =
            serde_pickle::from_slice(&render(&tracklets), DeOptions::new()).unwrap();

        assert_eq!(
            decoded,
            vec![
                PickleTrack {
                    label: "car".into(),
                    boxes,
                },
                PickleTrack {
                    label: "person".into(),
                    boxes: vec![],
                },
            ]
        );
    }
}
