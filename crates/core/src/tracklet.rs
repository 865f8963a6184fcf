//! Tracklet assembly.
//!
//! Turns every path of every completed job into one whole-video
//! [`Tracklet`]. Paths are never merged across segment boundaries: two jobs
//! that tracked the same physical object in overlapping segments produce two
//! tracklets, and resolving object identity is left to the consumer.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::Serialize;

use crate::bbox::FrameBox;
use crate::error::CoreError;
use crate::interpolation;
use crate::snapshot::{SnapshotSource, VideoSnapshot};

// ---------------------------------------------------------------------------
// Duplicate frame policy
// ---------------------------------------------------------------------------

/// What to do when several boxes of one tracklet claim the same frame.
///
/// Duplicates come from segment overlap regions or from workers drawing a
/// keyframe twice. The default keeps all of them in their original relative
/// order; downstream formats keyed by frame (JSON) then keep the last one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateFramePolicy {
    #[default]
    KeepAll,
    KeepLast,
}

const VALID_POLICY_STRINGS: &[&str] = &["keep-all", "keep-last"];

impl DuplicateFramePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepAll => "keep-all",
            Self::KeepLast => "keep-last",
        }
    }
}

impl FromStr for DuplicateFramePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep-all" => Ok(Self::KeepAll),
            "keep-last" => Ok(Self::KeepLast),
            _ => Err(CoreError::Validation(format!(
                "Invalid duplicate frame policy '{s}'. Must be one of: {}",
                VALID_POLICY_STRINGS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tracklet
// ---------------------------------------------------------------------------

/// Boxes of one object across frames, with the workers who drew them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tracklet {
    pub label: String,
    pub boxes: Vec<FrameBox>,
    pub workers: BTreeSet<String>,
}

impl Tracklet {
    /// Build a tracklet, stably sorting `boxes` by frame.
    pub fn new<I, S>(label: impl Into<String>, mut boxes: Vec<FrameBox>, workers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        boxes.sort_by_key(|b| b.frame);
        Self {
            label: label.into(),
            boxes,
            workers: workers.into_iter().map(Into::into).collect(),
        }
    }

    /// Apply `policy` to boxes that share a frame.
    pub fn with_duplicate_policy(mut self, policy: DuplicateFramePolicy) -> Self {
        if policy == DuplicateFramePolicy::KeepLast {
            self.boxes = keep_last_per_frame(self.boxes);
        }
        self
    }

    /// A copy with every missing frame between the first and last box filled.
    pub fn interpolated(&self) -> Self {
        Self {
            label: self.label.clone(),
            boxes: interpolation::fill(&self.boxes),
            workers: self.workers.clone(),
        }
    }

    /// Whether any two boxes claim the same frame.
    pub fn has_duplicate_frames(&self) -> bool {
        self.boxes.windows(2).any(|w| w[0].frame == w[1].frame)
    }

    pub fn first_frame(&self) -> Option<i32> {
        self.boxes.first().map(|b| b.frame)
    }

    pub fn last_frame(&self) -> Option<i32> {
        self.boxes.last().map(|b| b.frame)
    }
}

/// Collapse runs of equal frames in a frame-sorted sequence to their last box.
fn keep_last_per_frame(boxes: Vec<FrameBox>) -> Vec<FrameBox> {
    let mut kept: Vec<FrameBox> = Vec::with_capacity(boxes.len());
    for b in boxes {
        match kept.last_mut() {
            Some(prev) if prev.frame == b.frame => *prev = b,
            _ => kept.push(b),
        }
    }
    kept
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Flatten a video snapshot into tracklets, one per path.
///
/// Order follows segments, then jobs within a segment, then paths within a
/// job, which fixes the zero-based ids exporters assign.
pub fn assemble(snapshot: &VideoSnapshot, policy: DuplicateFramePolicy) -> Vec<Tracklet> {
    let mut tracklets = Vec::with_capacity(snapshot.path_count());
    for segment in &snapshot.segments {
        for job in &segment.jobs {
            for path in &job.paths {
                let tracklet = Tracklet::new(
                    path.label.clone(),
                    path.boxes.clone(),
                    [job.worker_id.as_str()],
                )
                .with_duplicate_policy(policy);
                tracklets.push(tracklet);
            }
        }
    }
    tracklets
}

/// Read the snapshot for `slug` from `source` and assemble its tracklets.
///
/// Returns [`CoreError::NotFound`] if the video does not exist. A video
/// without segments or completed jobs yields an empty list.
pub async fn assemble_tracklets<S>(
    source: &S,
    slug: &str,
    policy: DuplicateFramePolicy,
) -> Result<Vec<Tracklet>, CoreError>
where
    S: SnapshotSource + ?Sized,
{
    let snapshot = source
        .load_snapshot(slug)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "video",
            key: slug.to_string(),
        })?;
    Ok(assemble(&snapshot, policy))
}

/// Interpolate every tracklet.
pub fn interpolate_all(tracklets: &[Tracklet]) -> Vec<Tracklet> {
    tracklets.iter().map(Tracklet::interpolated).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::SegmentRange;
    use crate::snapshot::{CompletedJob, MemoryStore, PathRecord};
    use crate::video::{Segment, Video};
    use assert_matches::assert_matches;

    fn b(frame: i32, x: f64) -> FrameBox {
        FrameBox::new(frame, x, x, x + 10.0, x + 10.0)
    }

    fn single_path_snapshot(boxes: Vec<FrameBox>) -> VideoSnapshot {
        let mut snapshot = VideoSnapshot::new(Video::new("v", 100, 100, 50));
        snapshot.push_segment(
            Segment::new("v", SegmentRange::new(0, 50)),
            vec![CompletedJob::new("worker-a", vec![PathRecord::new("car", boxes)])],
        );
        snapshot
    }

    // -- assemble ------------------------------------------------------------

    #[test]
    fn one_path_becomes_one_sorted_tracklet() {
        let snapshot = single_path_snapshot(vec![b(20, 2.0), b(0, 0.0), b(10, 1.0)]);
        let tracklets = assemble(&snapshot, DuplicateFramePolicy::KeepAll);

        assert_eq!(tracklets.len(), 1);
        let t = &tracklets[0];
        assert_eq!(t.label, "car");
        let frames: Vec<i32> = t.boxes.iter().map(|b| b.frame).collect();
        assert_eq!(frames, vec![0, 10, 20]);
        assert_eq!(t.workers.iter().collect::<Vec<_>>(), vec!["worker-a"]);
    }

    #[test]
    fn paths_are_not_merged_across_segments() {
        let mut snapshot = VideoSnapshot::new(Video::new("v", 100, 100, 650));
        snapshot.push_segment(
            Segment::new("v", SegmentRange::new(0, 321)),
            vec![CompletedJob::new("w1", vec![PathRecord::new("car", vec![b(320, 5.0)])])],
        );
        snapshot.push_segment(
            Segment::new("v", SegmentRange::new(300, 621)),
            vec![CompletedJob::new("w2", vec![PathRecord::new("car", vec![b(320, 5.0)])])],
        );

        let tracklets = assemble(&snapshot, DuplicateFramePolicy::KeepAll);
        assert_eq!(tracklets.len(), 2);
        assert!(tracklets[0].workers.contains("w1"));
        assert!(tracklets[1].workers.contains("w2"));
    }

    #[test]
    fn order_follows_segments_then_jobs_then_paths() {
        let mut snapshot = VideoSnapshot::new(Video::new("v", 100, 100, 650));
        snapshot.push_segment(
            Segment::new("v", SegmentRange::new(300, 621)),
            vec![CompletedJob::new("w3", vec![PathRecord::new("c", vec![])])],
        );
        snapshot.push_segment(
            Segment::new("v", SegmentRange::new(0, 321)),
            vec![
                CompletedJob::new(
                    "w1",
                    vec![PathRecord::new("a1", vec![]), PathRecord::new("a2", vec![])],
                ),
                CompletedJob::new("w2", vec![PathRecord::new("b", vec![])]),
            ],
        );

        let labels: Vec<String> = assemble(&snapshot, DuplicateFramePolicy::KeepAll)
            .into_iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(labels, vec!["a1", "a2", "b", "c"]);
    }

    #[test]
    fn duplicate_frames_are_kept_in_place_by_default() {
        let first = b(5, 1.0);
        let second = b(5, 2.0);
        let snapshot = single_path_snapshot(vec![b(9, 0.0), first, second]);

        let t = &assemble(&snapshot, DuplicateFramePolicy::KeepAll)[0];
        assert_eq!(t.boxes, vec![first, second, b(9, 0.0)]);
        assert!(t.has_duplicate_frames());
    }

    #[test]
    fn keep_last_collapses_duplicate_frames() {
        let snapshot = single_path_snapshot(vec![b(5, 1.0), b(9, 0.0), b(5, 2.0), b(5, 3.0)]);

        let t = &assemble(&snapshot, DuplicateFramePolicy::KeepLast)[0];
        assert_eq!(t.boxes, vec![b(5, 3.0), b(9, 0.0)]);
        assert!(!t.has_duplicate_frames());
    }

    #[test]
    fn video_without_segments_yields_nothing() {
        let snapshot = VideoSnapshot::new(Video::new("v", 1, 1, 0));
        assert!(assemble(&snapshot, DuplicateFramePolicy::KeepAll).is_empty());
    }

    #[test]
    fn segment_without_jobs_yields_nothing() {
        let mut snapshot = VideoSnapshot::new(Video::new("v", 1, 1, 10));
        snapshot.push_segment(Segment::new("v", SegmentRange::new(0, 10)), vec![]);
        assert!(assemble(&snapshot, DuplicateFramePolicy::KeepAll).is_empty());
    }

    // -- assemble_tracklets -------------------------------------------------

    #[tokio::test]
    async fn unknown_video_is_not_found() {
        let store = MemoryStore::new();
        let result = assemble_tracklets(&store, "nope", DuplicateFramePolicy::KeepAll).await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "video", .. }));
    }

    #[tokio::test]
    async fn assembles_through_store_handle() {
        let mut store = MemoryStore::new();
        store.insert(single_path_snapshot(vec![b(1, 0.0)]));
        let tracklets = assemble_tracklets(&store, "v", DuplicateFramePolicy::KeepAll)
            .await
            .unwrap();
        assert_eq!(tracklets.len(), 1);
        assert_eq!(tracklets[0].first_frame(), Some(1));
        assert_eq!(tracklets[0].last_frame(), Some(1));
    }

    // -- policy parsing -----------------------------------------------------

    #[test]
    fn policy_round_trips_through_str() {
        for policy in [DuplicateFramePolicy::KeepAll, DuplicateFramePolicy::KeepLast] {
            assert_eq!(policy.as_str().parse::<DuplicateFramePolicy>().unwrap(), policy);
        }
        assert_matches!(
            "first".parse::<DuplicateFramePolicy>(),
            Err(CoreError::Validation(_))
        );
    }

    // -- interpolation hook -------------------------------------------------

    #[test]
    fn interpolated_keeps_label_and_workers() {
        let t = Tracklet::new("car", vec![b(0, 0.0), b(4, 4.0)], ["w"]);
        let filled = t.interpolated();
        assert_eq!(filled.label, "car");
        assert_eq!(filled.workers, t.workers);
        assert_eq!(filled.boxes.len(), 5);
        assert_eq!(interpolate_all(&[t.clone(), t]).len(), 2);
    }
}
