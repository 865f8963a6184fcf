//! Job entity model.
//!
//! Jobs are created one per segment at import; the task marketplace fills in
//! `worker_id`, `published` and `completed` afterwards.

use serde::Serialize;
use sqlx::FromRow;
use vatic_core::types::DbId;

use crate::models::Timestamp;

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub segment_id: DbId,
    pub worker_id: Option<String>,
    pub ready: bool,
    pub published: bool,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
