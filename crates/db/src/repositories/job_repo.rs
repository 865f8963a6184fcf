//! Repository for the `jobs` table.

use sqlx::PgPool;

use crate::models::job::Job;

/// Column list for jobs queries, qualified for joins against `segments`.
const COLUMNS: &str = "j.id, j.segment_id, j.worker_id, j.ready, j.published, \
    j.completed, j.created_at, j.updated_at";

/// Access to the jobs of a video's segments.
pub struct JobRepo;

impl JobRepo {
    /// List every job of a video, ordered by segment start then job id.
    pub async fn list_by_video(pool: &PgPool, video_slug: &str) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs j
             JOIN segments s ON s.id = j.segment_id
             WHERE s.video_slug = $1
             ORDER BY s.start_frame ASC, j.id ASC"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(video_slug)
            .fetch_all(pool)
            .await
    }
}
