//! Video import: video row, labels, segments and one job per segment.

use sqlx::PgPool;
use vatic_core::planning::SegmentRange;

use crate::models::video::{CreateVideo, Video};
use crate::repositories::video_repo;

/// Result of a successful import.
#[derive(Debug, Clone)]
pub struct ImportedVideo {
    pub video: Video,
    pub label_count: usize,
    pub segment_count: usize,
}

/// Writes a whole video import in a single transaction.
pub struct ImportRepo;

impl ImportRepo {
    /// Insert the video, bind its labels, and create every planned segment
    /// with one job each. Nothing is written if any step fails.
    pub async fn import_video(
        pool: &PgPool,
        input: &CreateVideo,
        labels: &[String],
        segments: &[SegmentRange],
    ) -> Result<ImportedVideo, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO videos
                (slug, location, width, height, total_frames, skip, training_video_slug)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            video_repo::COLUMNS
        );
        let video = sqlx::query_as::<_, Video>(&query)
            .bind(&input.slug)
            .bind(&input.location)
            .bind(input.width)
            .bind(input.height)
            .bind(input.total_frames)
            .bind(input.skip)
            .bind(&input.training_video_slug)
            .fetch_one(&mut *tx)
            .await?;

        for text in labels {
            sqlx::query("INSERT INTO labels (video_slug, text) VALUES ($1, $2)")
                .bind(&video.slug)
                .bind(text)
                .execute(&mut *tx)
                .await?;
        }

        for range in segments {
            let segment_id: (i64,) = sqlx::query_as(
                "INSERT INTO segments (video_slug, start_frame, stop_frame)
                 VALUES ($1, $2, $3)
                 RETURNING id",
            )
            .bind(&video.slug)
            .bind(range.start)
            .bind(range.stop)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("INSERT INTO jobs (segment_id) VALUES ($1)")
                .bind(segment_id.0)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            slug = %video.slug,
            labels = labels.len(),
            segments = segments.len(),
            "Video import committed"
        );

        Ok(ImportedVideo {
            video,
            label_count: labels.len(),
            segment_count: segments.len(),
        })
    }
}
