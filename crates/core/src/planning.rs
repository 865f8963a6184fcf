//! Segment planning for parallel annotation.
//!
//! A video's frame range is cut into fixed-length work segments that overlap
//! their successor, so that annotations on either side of a boundary can be
//! compared or stitched together downstream.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::FrameIndex;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default segment length in frames.
pub const DEFAULT_SEGMENT_LENGTH: FrameIndex = 300;

/// Default number of extra frames each segment shares with the next one.
pub const DEFAULT_SEGMENT_OVERLAP: FrameIndex = 20;

// ---------------------------------------------------------------------------
// Segment range
// ---------------------------------------------------------------------------

/// Half-open frame range `[start, stop)` covered by one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SegmentRange {
    pub start: FrameIndex,
    pub stop: FrameIndex,
}

impl SegmentRange {
    pub fn new(start: FrameIndex, stop: FrameIndex) -> Self {
        Self { start, stop }
    }
}

#[cfg(test)]
impl SegmentRange {
    pub(crate) fn len(&self) -> FrameIndex {
        self.stop - self.start
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stop <= self.start
    }
}

impl From<(FrameIndex, FrameIndex)> for SegmentRange {
    fn from((start, stop): (FrameIndex, FrameIndex)) -> Self {
        Self { start, stop }
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Plan the ordered list of overlapping segments covering `[0, total_frames)`.
///
/// Segments start at `0, length, 2 * length, ...` and each one stops at
/// `min(start + length + overlap + 1, total_frames)`, computed without
/// overflow for any `length` and `overlap`. The extra frame makes
/// the first frame of every segment also the last frame of its predecessor,
/// so adjacent segments always share at least one frame.
///
/// A video with zero frames yields no segments.
pub fn plan_segments(
    total_frames: FrameIndex,
    length: FrameIndex,
    overlap: FrameIndex,
) -> Result<Vec<SegmentRange>, CoreError> {
    validate_plan_params(total_frames, length, overlap)?;

    let span = length.saturating_add(overlap).saturating_add(1);
    let mut segments = Vec::with_capacity((total_frames / length + 1) as usize);
    let mut start = 0;
    while start < total_frames {
        let stop = start.saturating_add(span).min(total_frames);
        segments.push(SegmentRange { start, stop });
        start = match start.checked_add(length) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(segments)
}

/// Validate planner inputs.
///
/// - `total_frames >= 0`
/// - `length > 0`
/// - `overlap >= 0`
pub fn validate_plan_params(
    total_frames: FrameIndex,
    length: FrameIndex,
    overlap: FrameIndex,
) -> Result<(), CoreError> {
    if total_frames < 0 {
        return Err(CoreError::Validation(format!(
            "total frame count must be >= 0, got {total_frames}"
        )));
    }
    if length <= 0 {
        return Err(CoreError::Validation(format!(
            "segment length must be > 0, got {length}"
        )));
    }
    if overlap < 0 {
        return Err(CoreError::Validation(format!(
            "segment overlap must be >= 0, got {overlap}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
