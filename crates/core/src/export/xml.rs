//! XML: `<annotations count>` / `<track id label>` / `<box .../>`.
//!
//! Flag attributes are written as `1`/`0` integers rather than `True`/`False`.

use std::fmt::Display;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{flag, ExportError, ExportFormat, Exporter};
use crate::bbox::FrameBox;
use crate::tracklet::Tracklet;

const ROOT: &str = "annotations";
const TRACK: &str = "track";
const BOX: &str = "box";

/// Writes one `<track>` per tracklet with a self-closing `<box>` per box.
///
/// `lost` is written as the `outside` attribute. Flag attributes hold `1` or
/// `0`, not `True`/`False`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlExporter;

impl Exporter for XmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xml
    }

    fn serialize(&self, tracklets: &[Tracklet], sink: &mut dyn Write) -> Result<(), ExportError> {
        let mut writer = Writer::new_with_indent(&mut *sink, b'\t', 1);

        let count = tracklets.len().to_string();
        let mut root = BytesStart::new(ROOT);
        root.push_attribute(("count", count.as_str()));
        writer.write_event(Event::Start(root)).map_err(xml_error)?;

        for (id, track) in tracklets.iter().enumerate() {
            let id = id.to_string();
            let mut element = BytesStart::new(TRACK);
            element.push_attribute(("id", id.as_str()));
            element.push_attribute(("label", track.label.as_str()));

            if track.boxes.is_empty() {
                writer.write_event(Event::Empty(element)).map_err(xml_error)?;
                continue;
            }

            writer.write_event(Event::Start(element)).map_err(xml_error)?;
            for b in &track.boxes {
                writer
                    .write_event(Event::Empty(box_element(b)))
                    .map_err(xml_error)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(TRACK)))
                .map_err(xml_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(ROOT)))
            .map_err(xml_error)?;
        sink.write_all(b"\n")?;
        Ok(())
    }
}

fn box_element(b: &FrameBox) -> BytesStart<'static> {
    let mut element = BytesStart::new(BOX);
    for (name, value) in [
        ("frame", b.frame.to_string()),
        ("xtl", b.xtl.to_string()),
        ("ytl", b.ytl.to_string()),
        ("xbr", b.xbr.to_string()),
        ("ybr", b.ybr.to_string()),
        ("outside", flag(b.lost).to_string()),
        ("occluded", flag(b.occluded).to_string()),
    ] {
        element.push_attribute((name, value.as_str()));
    }
    element
}

fn xml_error<E: Display>(err: E) -> ExportError {
    ExportError::Xml(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    fn render(tracklets: &[Tracklet]) -> String {
        let mut buf = Vec::new();
        XmlExporter.serialize(tracklets, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Parse the document, returning the `count` attribute and the number of
    /// `<track>` and `<box>` elements.
    fn parse(doc: &str) -> (String, usize, usize) {
        let mut reader = Reader::from_str(doc);
        let mut count = String::new();
        let (mut tracks, mut boxes) = (0, 0);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"annotations" => {
                        let attr = e.try_get_attribute("count").unwrap().unwrap();
                        count = String::from_utf8(attr.value.to_vec()).unwrap();
                    }
                    b"track" => tracks += 1,
                    b"box" => boxes += 1,
                    other => panic!("unexpected element {other:?}"),
                },
                Ok(_) => {}
                Err(e) => panic!("invalid XML: {e}"),
            }
        }
        (count, tracks, boxes)
    }

    #[test]
    fn empty_input_renders_zero_count_root() {
        let doc = render(&[]);
        assert!(doc.contains("count=\"0\""));
        assert_eq!(parse(&doc), ("0".to_string(), 0, 0));
    }

    #[test]
    fn boxes_use_outside_for_lost() {
        let tracklets = vec![Tracklet::new(
            "car",
            vec![
                FrameBox::new(0, 1.0, 2.0, 3.0, 4.0),
                FrameBox::new(1, 1.0, 2.0, 3.0, 4.0).with_lost(true),
            ],
            ["w"],
        )];
        let doc = render(&tracklets);

        assert!(doc.contains(
            "<box frame=\"0\" xtl=\"1\" ytl=\"2\" xbr=\"3\" ybr=\"4\" outside=\"0\" occluded=\"0\"/>"
        ));
        assert!(doc.contains("outside=\"1\""));
        assert!(!doc.contains("lost"));
        assert_eq!(parse(&doc), ("1".to_string(), 1, 2));
    }

    #[test]
    fn track_ids_follow_input_order() {
        let tracklets = vec![
            Tracklet::new("a", vec![FrameBox::new(0, 0.0, 0.0, 1.0, 1.0)], ["w"]),
            Tracklet::new("b", vec![], ["w"]),
        ];
        let doc = render(&tracklets);
        assert!(doc.contains("<track id=\"0\" label=\"a\">"));
        assert!(doc.contains("<track id=\"1\" label=\"b\"/>"));
        assert_eq!(parse(&doc), ("2".to_string(), 2, 1));
    }

    #[test]
    fn labels_are_escaped() {
        let tracklets = vec![Tracklet::new("<cat & \"dog\">", vec![], ["w"])];
        let doc = render(&tracklets);
        assert!(!doc.contains("<cat"));
        assert_eq!(parse(&doc).1, 1);
    }
}
