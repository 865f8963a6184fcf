//! Repository for the `labels` table.

use sqlx::PgPool;

use crate::models::label::Label;

/// Column list for labels queries.
pub(crate) const COLUMNS: &str = "id, video_slug, text, created_at";

/// Read access to the labels bound to a video.
pub struct LabelRepo;

impl LabelRepo {
    /// List a video's labels in the order they were bound.
    pub async fn list_by_video(pool: &PgPool, video_slug: &str) -> Result<Vec<Label>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM labels WHERE video_slug = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Label>(&query)
            .bind(video_slug)
            .fetch_all(pool)
            .await
    }
}
