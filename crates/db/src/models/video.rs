//! Video entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vatic_core::video::Label;

use crate::models::Timestamp;

/// A row from the `videos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Video {
    pub slug: String,
    pub location: String,
    pub width: i32,
    pub height: i32,
    pub total_frames: i32,
    pub skip: i32,
    pub is_training: bool,
    pub training_video_slug: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    /// Convert into the core domain type, attaching `labels`.
    pub fn into_domain(self, labels: Vec<Label>) -> vatic_core::video::Video {
        vatic_core::video::Video {
            slug: self.slug,
            width: self.width,
            height: self.height,
            total_frames: self.total_frames,
            skip: self.skip,
            is_training: self.is_training,
            training_video: self.training_video_slug,
            labels,
        }
    }
}

/// DTO for importing a new video.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideo {
    pub slug: String,
    pub location: String,
    pub width: i32,
    pub height: i32,
    pub total_frames: i32,
    pub skip: i32,
    pub training_video_slug: Option<String>,
}
