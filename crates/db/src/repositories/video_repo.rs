//! Repository for the `videos` table.

use sqlx::PgPool;

use crate::models::video::Video;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "slug, location, width, height, total_frames, skip, \
    is_training, training_video_slug, created_at, updated_at";

/// Result of [`VideoRepo::mark_training`].
#[derive(Debug, Clone)]
pub struct TrainingUpdate {
    pub video: Video,
    /// The video was already a training video before this call.
    pub was_training: bool,
    /// Jobs already posted to the marketplace.
    pub published_jobs: i64,
    pub jobs_withdrawn: u64,
}

/// Provides lookups and lifecycle operations for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Find a video by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE slug = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether a video with this slug exists.
    pub async fn exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM videos WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// List all videos, ordered by slug.
    pub async fn list(pool: &PgPool) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos ORDER BY slug ASC");
        sqlx::query_as::<_, Video>(&query).fetch_all(pool).await
    }

    /// Mark a video as a training video and withdraw all of its jobs from
    /// the marketplace, in one transaction. Returns `None` if the video does
    /// not exist.
    pub async fn mark_training(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<TrainingUpdate>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let previous: Option<(bool,)> =
            sqlx::query_as("SELECT is_training FROM videos WHERE slug = $1 FOR UPDATE")
                .bind(slug)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((was_training,)) = previous else {
            tx.rollback().await?;
            return Ok(None);
        };

        let query = format!(
            "UPDATE videos SET is_training = true, updated_at = now()
             WHERE slug = $1
             RETURNING {COLUMNS}"
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(slug)
            .fetch_one(&mut *tx)
            .await?;

        let (published_jobs,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM jobs j
             JOIN segments s ON s.id = j.segment_id
             WHERE s.video_slug = $1 AND j.published",
        )
        .bind(slug)
        .fetch_one(&mut *tx)
        .await?;

        let jobs_withdrawn = sqlx::query(
            "UPDATE jobs SET ready = false, updated_at = now()
             WHERE segment_id IN (SELECT id FROM segments WHERE video_slug = $1)",
        )
        .bind(slug)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok(Some(TrainingUpdate {
            video,
            was_training,
            published_jobs,
            jobs_withdrawn,
        }))
    }

    /// Delete a video and, by cascade, everything attached to it.
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE slug = $1")
            .bind(slug)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count annotated paths across all jobs of a video.
    pub async fn count_paths(pool: &PgPool, slug: &str) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM paths p
             JOIN jobs j ON j.id = p.job_id
             JOIN segments s ON s.id = j.segment_id
             WHERE s.video_slug = $1",
        )
        .bind(slug)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
