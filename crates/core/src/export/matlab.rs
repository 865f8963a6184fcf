//! MATLAB level 5 MAT-file with one struct array named `annotations`.
//!
//! The struct array is `1 x N` with one element per box (flattened across
//! tracklets) and fields `id, xtl, ytl, xbr, ybr, frame, lost, occluded,
//! label`. Numbers are stored as doubles, flags as logicals, the label as a
//! UTF-16 char row. Everything is little-endian and uncompressed.

use std::io::Write;

use super::{ExportError, ExportFormat, Exporter};
use crate::bbox::FrameBox;
use crate::tracklet::Tracklet;

/// Variable name of the struct array inside the MAT-file.
pub const MATLAB_VARIABLE_NAME: &str = "annotations";

const FIELDS: &[&str] = &[
    "id", "xtl", "ytl", "xbr", "ybr", "frame", "lost", "occluded", "label",
];

/// Fixed field-name slot width, including the NUL terminator.
const FIELD_NAME_LEN: usize = 32;

const HEADER_TEXT_LEN: usize = 116;
const HEADER_VERSION: u16 = 0x0100;

// Data element types.
const MI_INT8: u32 = 1;
const MI_UINT8: u32 = 2;
const MI_UINT16: u32 = 4;
const MI_INT32: u32 = 5;
const MI_UINT32: u32 = 6;
const MI_DOUBLE: u32 = 9;
const MI_MATRIX: u32 = 14;

// Array classes and flags.
const MX_STRUCT_CLASS: u32 = 2;
const MX_CHAR_CLASS: u32 = 4;
const MX_DOUBLE_CLASS: u32 = 6;
const MX_UINT8_CLASS: u32 = 9;
const MX_LOGICAL_FLAG: u32 = 0x0200;

#[derive(Debug, Clone, Copy, Default)]
pub struct MatlabExporter;

impl Exporter for MatlabExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Matlab
    }

    fn serialize(&self, tracklets: &[Tracklet], sink: &mut dyn Write) -> Result<(), ExportError> {
        let records: Vec<(usize, &str, &FrameBox)> = tracklets
            .iter()
            .enumerate()
            .flat_map(|(id, t)| t.boxes.iter().map(move |b| (id, t.label.as_str(), b)))
            .collect();

        let columns = i32::try_from(records.len()).map_err(|_| {
            ExportError::Matlab(format!("too many boxes for one struct array: {}", records.len()))
        })?;

        let mut body = Vec::new();
        // Field name length uses the packed small-element form.
        body.extend_from_slice(&((4u32 << 16) | MI_INT32).to_le_bytes());
        body.extend_from_slice(&(FIELD_NAME_LEN as i32).to_le_bytes());

        let mut names = Vec::with_capacity(FIELDS.len() * FIELD_NAME_LEN);
        for field in FIELDS {
            let mut slot = [0u8; FIELD_NAME_LEN];
            slot[..field.len()].copy_from_slice(field.as_bytes());
            names.extend_from_slice(&slot);
        }
        data_element(MI_INT8, &names, &mut body);

        for (id, label, b) in records {
            body.extend(double(id as f64)?);
            body.extend(double(b.xtl)?);
            body.extend(double(b.ytl)?);
            body.extend(double(b.xbr)?);
            body.extend(double(b.ybr)?);
            body.extend(double(f64::from(b.frame))?);
            body.extend(logical(b.lost)?);
            body.extend(logical(b.occluded)?);
            body.extend(char_row(label)?);
        }

        let array = matrix(MX_STRUCT_CLASS, [1, columns], MATLAB_VARIABLE_NAME, &body)?;

        sink.write_all(&header())?;
        sink.write_all(&array)?;
        Ok(())
    }
}

/// 128-byte file header: description text, subsystem offset, version, endian marker.
fn header() -> Vec<u8> {
    let mut text = format!(
        "MATLAB 5.0 MAT-file, Platform: {}, written by vatic {}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    )
    .into_bytes();
    text.resize(HEADER_TEXT_LEN, b' ');

    let mut header = text;
    header.extend_from_slice(&[0u8; 8]);
    header.extend_from_slice(&HEADER_VERSION.to_le_bytes());
    header.extend_from_slice(b"IM");
    header
}

/// Append a tagged data element, zero-padded to an 8-byte boundary.
fn data_element(ty: u32, payload: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&ty.to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    let padding = (8 - payload.len() % 8) % 8;
    out.extend(std::iter::repeat(0u8).take(padding));
}

/// Build an `miMATRIX` element from its class flags, dimensions, name and
/// already-encoded body.
fn matrix(flags: u32, dims: [i32; 2], name: &str, body: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut inner = Vec::with_capacity(48 + body.len());

    let mut flag_bytes = [0u8; 8];
    flag_bytes[..4].copy_from_slice(&flags.to_le_bytes());
    data_element(MI_UINT32, &flag_bytes, &mut inner);

    let mut dim_bytes = [0u8; 8];
    dim_bytes[..4].copy_from_slice(&dims[0].to_le_bytes());
    dim_bytes[4..].copy_from_slice(&dims[1].to_le_bytes());
    data_element(MI_INT32, &dim_bytes, &mut inner);

    data_element(MI_INT8, name.as_bytes(), &mut inner);
    inner.extend_from_slice(body);

    let size = u32::try_from(inner.len())
        .map_err(|_| ExportError::Matlab(format!("array too large: {} bytes", inner.len())))?;

    let mut out = Vec::with_capacity(8 + inner.len());
    out.extend_from_slice(&MI_MATRIX.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend(inner);
    Ok(out)
}

fn double(value: f64) -> Result<Vec<u8>, ExportError> {
    let mut body = Vec::with_capacity(16);
    data_element(MI_DOUBLE, &value.to_le_bytes(), &mut body);
    matrix(MX_DOUBLE_CLASS, [1, 1], "", &body)
}

fn logical(value: bool) -> Result<Vec<u8>, ExportError> {
    let mut body = Vec::with_capacity(16);
    data_element(MI_UINT8, &[u8::from(value)], &mut body);
    matrix(MX_UINT8_CLASS | MX_LOGICAL_FLAG, [1, 1], "", &body)
}

fn char_row(text: &str) -> Result<Vec<u8>, ExportError> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let payload: Vec<u8> = units.iter().flat_map(|u| u.to_le_bytes()).collect();
    let mut body = Vec::with_capacity(8 + payload.len() + 8);
    data_element(MI_UINT16, &payload, &mut body);
    let dims = if units.is_empty() {
        [0, 0]
    } else {
        [1, units.len() as i32]
    };
    matrix(MX_CHAR_CLASS, dims, "", &body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
