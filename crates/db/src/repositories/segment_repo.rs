//! Repository for the `segments` table.

use sqlx::PgPool;

use crate::models::segment::Segment;

/// Column list for segments queries.
pub(crate) const COLUMNS: &str = "id, video_slug, start_frame, stop_frame, created_at";

/// Read access to a video's planned segments.
pub struct SegmentRepo;

impl SegmentRepo {
    /// List all segments of a video, ordered by start frame ascending.
    pub async fn list_by_video(pool: &PgPool, video_slug: &str) -> Result<Vec<Segment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM segments
             WHERE video_slug = $1
             ORDER BY start_frame ASC"
        );
        sqlx::query_as::<_, Segment>(&query)
            .bind(video_slug)
            .fetch_all(pool)
            .await
    }
}
