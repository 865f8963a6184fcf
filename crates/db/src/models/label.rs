//! Label entity model.

use serde::Serialize;
use sqlx::FromRow;
use vatic_core::types::DbId;

use crate::models::Timestamp;

/// A row from the `labels` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Label {
    pub id: DbId,
    pub video_slug: String,
    pub text: String,
    pub created_at: Timestamp,
}

impl From<Label> for vatic_core::video::Label {
    fn from(row: Label) -> Self {
        Self { text: row.text }
    }
}
