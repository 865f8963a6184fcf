//! Read-only snapshot of one video's annotation graph.
//!
//! The assembler never talks to a store directly. A [`SnapshotSource`]
//! produces a [`VideoSnapshot`] that is consistent for the whole assembly
//! pass; jobs completing while the snapshot is taken may be missed.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::bbox::FrameBox;
use crate::error::CoreError;
use crate::video::{Segment, Video};

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

/// One object track drawn by one worker on one job. Boxes are unordered.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRecord {
    pub label: String,
    pub boxes: Vec<FrameBox>,
}

impl PathRecord {
    pub fn new(label: impl Into<String>, boxes: Vec<FrameBox>) -> Self {
        Self {
            label: label.into(),
            boxes,
        }
    }
}

/// A completed job and the paths its worker submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedJob {
    pub worker_id: String,
    pub paths: Vec<PathRecord>,
}

impl CompletedJob {
    pub fn new(worker_id: impl Into<String>, paths: Vec<PathRecord>) -> Self {
        Self {
            worker_id: worker_id.into(),
            paths,
        }
    }
}

/// A segment with the completed jobs done over it.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSnapshot {
    pub segment: Segment,
    pub jobs: Vec<CompletedJob>,
}

/// A video with its segments ordered by `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSnapshot {
    pub video: Video,
    pub segments: Vec<SegmentSnapshot>,
}

impl VideoSnapshot {
    pub fn new(video: Video) -> Self {
        Self {
            video,
            segments: Vec::new(),
        }
    }

    /// Append a segment, keeping segments ordered by `start`.
    pub fn push_segment(&mut self, segment: Segment, jobs: Vec<CompletedJob>) {
        let at = self
            .segments
            .partition_point(|s| s.segment.start <= segment.start);
        self.segments.insert(at, SegmentSnapshot { segment, jobs });
    }

    /// Total number of paths across all segments and jobs.
    pub fn path_count(&self) -> usize {
        self.segments
            .iter()
            .flat_map(|s| &s.jobs)
            .map(|j| j.paths.len())
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Store handle able to produce a consistent snapshot of one video.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Load the snapshot for `slug`, or `None` if no such video exists.
    async fn load_snapshot(&self, slug: &str) -> Result<Option<VideoSnapshot>, CoreError>;
}

/// In-memory [`SnapshotSource`], keyed by video slug.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    videos: HashMap<String, VideoSnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a video snapshot.
    pub fn insert(&mut self, snapshot: VideoSnapshot) {
        self.videos.insert(snapshot.video.slug.clone(), snapshot);
    }
}

#[async_trait]
impl SnapshotSource for MemoryStore {
    async fn load_snapshot(&self, slug: &str) -> Result<Option<VideoSnapshot>, CoreError> {
        Ok(self.videos.get(slug).cloned())
    }
}
