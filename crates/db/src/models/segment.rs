//! Segment entity model.

use serde::Serialize;
use sqlx::FromRow;
use vatic_core::planning::SegmentRange;
use vatic_core::types::DbId;

use crate::models::Timestamp;

/// A row from the `segments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Segment {
    pub id: DbId,
    pub video_slug: String,
    pub start_frame: i32,
    pub stop_frame: i32,
    pub created_at: Timestamp,
}

impl Segment {
    pub fn range(&self) -> SegmentRange {
        SegmentRange::new(self.start_frame, self.stop_frame)
    }
}

impl From<&Segment> for vatic_core::video::Segment {
    fn from(row: &Segment) -> Self {
        Self::new(row.video_slug.clone(), row.range())
    }
}
