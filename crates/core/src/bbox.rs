//! Per-frame bounding box annotation.
//!
//! A [`FrameBox`] is the smallest unit of annotation data: one object's
//! location in one frame plus its visibility flags. Boxes are produced by
//! annotation jobs and treated as read-only values everywhere else.

use serde::{Deserialize, Serialize};

use crate::types::FrameIndex;

/// One object's location in one frame.
///
/// Coordinates are in pixels, top-left (`xtl`, `ytl`) and bottom-right
/// (`xbr`, `ybr`) corners. `xtl <= xbr` and `ytl <= ybr` are assumed but not
/// enforced. A `lost` box is a placeholder for "object not present in this
/// frame"; its coordinates carry no location information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameBox {
    pub frame: FrameIndex,
    pub xtl: f64,
    pub ytl: f64,
    pub xbr: f64,
    pub ybr: f64,
    pub lost: bool,
    pub occluded: bool,
}

impl FrameBox {
    /// A visible, unoccluded box.
    pub fn new(frame: FrameIndex, xtl: f64, ytl: f64, xbr: f64, ybr: f64) -> Self {
        Self {
            frame,
            xtl,
            ytl,
            xbr,
            ybr,
            lost: false,
            occluded: false,
        }
    }

    pub fn with_lost(mut self, lost: bool) -> Self {
        self.lost = lost;
        self
    }

    pub fn with_occluded(mut self, occluded: bool) -> Self {
        self.occluded = occluded;
        self
    }

    /// The same box moved to another frame.
    pub fn at_frame(mut self, frame: FrameIndex) -> Self {
        self.frame = frame;
        self
    }

    /// The four corner coordinates in `(xtl, ytl, xbr, ybr)` order.
    pub fn coords(&self) -> (f64, f64, f64, f64) {
        (self.xtl, self.ytl, self.xbr, self.ybr)
    }
}
