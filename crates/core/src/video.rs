//! Video, label and segment domain types.

use serde::Serialize;

use crate::planning::SegmentRange;
use crate::types::FrameIndex;

/// An object class that annotators may assign to a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Label {
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One unit of annotation work over a frame range of a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub video_slug: String,
    pub start: FrameIndex,
    pub stop: FrameIndex,
}

impl Segment {
    pub fn new(video_slug: impl Into<String>, range: SegmentRange) -> Self {
        Self {
            video_slug: video_slug.into(),
            start: range.start,
            stop: range.stop,
        }
    }

    pub fn range(&self) -> SegmentRange {
        SegmentRange::new(self.start, self.stop)
    }
}

/// An imported video.
///
/// `total_frames` is discovered from frame storage at import time. Only
/// `is_training` changes after import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub slug: String,
    pub width: i32,
    pub height: i32,
    pub total_frames: FrameIndex,
    pub skip: i32,
    pub is_training: bool,
    pub training_video: Option<String>,
    pub labels: Vec<Label>,
}

impl Video {
    pub fn new(slug: impl Into<String>, width: i32, height: i32, total_frames: FrameIndex) -> Self {
        Self {
            slug: slug.into(),
            width,
            height,
            total_frames,
            skip: 0,
            is_training: false,
            training_video: None,
            labels: Vec::new(),
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Label::new).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_labels_are_bound_in_order() {
        let video = Video::new("street", 720, 480, 650).with_labels(["car", "person"]);
        assert_eq!(video.labels, vec![Label::new("car"), Label::new("person")]);
        assert!(!video.is_training);
    }

    #[test]
    fn segment_exposes_its_range() {
        let segment = Segment::new("street", SegmentRange::new(300, 621));
        assert_eq!(segment.range().len(), 321);
        assert_eq!(segment.video_slug, "street");
    }
}
