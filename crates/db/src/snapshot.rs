//! Postgres-backed [`SnapshotSource`].
//!
//! The whole segment / job / path / box graph of a video is read inside one
//! `REPEATABLE READ, READ ONLY` transaction, so an export sees a single
//! consistent state even while jobs keep completing.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use vatic_core::bbox::FrameBox;
use vatic_core::error::CoreError;
use vatic_core::snapshot::{CompletedJob, PathRecord, SnapshotSource, VideoSnapshot};
use vatic_core::types::DbId;

use crate::models::annotation_box::AnnotationBox;
use crate::models::label::Label;
use crate::models::segment::Segment;
use crate::models::video::Video;
use crate::repositories::{label_repo, segment_repo, video_repo};

/// A completed job with a known worker.
#[derive(Debug, Clone, FromRow)]
pub struct CompletedJobRow {
    pub id: DbId,
    pub segment_id: DbId,
    pub worker_id: String,
}

/// A path joined with its label text.
#[derive(Debug, Clone, FromRow)]
pub struct PathRow {
    pub id: DbId,
    pub job_id: DbId,
    pub label: String,
}

/// Snapshot source reading from the relational store.
#[derive(Debug, Clone)]
pub struct PgSnapshotSource {
    pool: PgPool,
}

impl PgSnapshotSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn read_snapshot(&self, slug: &str) -> Result<Option<VideoSnapshot>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let query = format!("SELECT {} FROM videos WHERE slug = $1", video_repo::COLUMNS);
        let Some(video) = sqlx::query_as::<_, Video>(&query)
            .bind(slug)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let query = format!(
            "SELECT {} FROM labels WHERE video_slug = $1 ORDER BY id ASC",
            label_repo::COLUMNS
        );
        let labels = sqlx::query_as::<_, Label>(&query)
            .bind(slug)
            .fetch_all(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {} FROM segments WHERE video_slug = $1 ORDER BY start_frame ASC",
            segment_repo::COLUMNS
        );
        let segments = sqlx::query_as::<_, Segment>(&query)
            .bind(slug)
            .fetch_all(&mut *tx)
            .await?;

        let jobs = sqlx::query_as::<_, CompletedJobRow>(
            "SELECT j.id, j.segment_id, j.worker_id FROM jobs j
             JOIN segments s ON s.id = j.segment_id
             WHERE s.video_slug = $1 AND j.completed AND j.worker_id IS NOT NULL
             ORDER BY s.start_frame ASC, j.id ASC",
        )
        .bind(slug)
        .fetch_all(&mut *tx)
        .await?;

        let paths = sqlx::query_as::<_, PathRow>(
            "SELECT p.id, p.job_id, l.text AS label FROM paths p
             JOIN labels l ON l.id = p.label_id
             JOIN jobs j ON j.id = p.job_id
             JOIN segments s ON s.id = j.segment_id
             WHERE s.video_slug = $1 AND j.completed AND j.worker_id IS NOT NULL
             ORDER BY p.id ASC",
        )
        .bind(slug)
        .fetch_all(&mut *tx)
        .await?;

        let boxes = sqlx::query_as::<_, AnnotationBox>(
            "SELECT b.id, b.path_id, b.frame, b.xtl, b.ytl, b.xbr, b.ybr, b.lost, b.occluded
             FROM boxes b
             JOIN paths p ON p.id = b.path_id
             JOIN jobs j ON j.id = p.job_id
             JOIN segments s ON s.id = j.segment_id
             WHERE s.video_slug = $1 AND j.completed AND j.worker_id IS NOT NULL
             ORDER BY b.path_id ASC, b.id ASC",
        )
        .bind(slug)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            slug,
            segments = segments.len(),
            jobs = jobs.len(),
            paths = paths.len(),
            boxes = boxes.len(),
            "Loaded video snapshot"
        );

        Ok(Some(build_snapshot(video, labels, segments, jobs, paths, boxes)))
    }
}

#[async_trait]
impl SnapshotSource for PgSnapshotSource {
    async fn load_snapshot(&self, slug: &str) -> Result<Option<VideoSnapshot>, CoreError> {
        self.read_snapshot(slug).await.map_err(|e| {
            tracing::error!(error = %e, slug, "Failed to read video snapshot");
            CoreError::Internal(format!("failed to read snapshot of video '{slug}': {e}"))
        })
    }
}

/// Group flat rows into a [`VideoSnapshot`].
///
/// Segment order is taken from `segments`; jobs, paths and boxes keep the
/// order they have in their row lists. Rows pointing at unknown parents are
/// dropped.
pub fn build_snapshot(
    video: Video,
    labels: Vec<Label>,
    segments: Vec<Segment>,
    jobs: Vec<CompletedJobRow>,
    paths: Vec<PathRow>,
    boxes: Vec<AnnotationBox>,
) -> VideoSnapshot {
    let mut boxes_by_path: HashMap<DbId, Vec<FrameBox>> = HashMap::new();
    for row in &boxes {
        boxes_by_path.entry(row.path_id).or_default().push(row.into());
    }

    let mut paths_by_job: HashMap<DbId, Vec<PathRecord>> = HashMap::new();
    for row in paths {
        let boxes = boxes_by_path.remove(&row.id).unwrap_or_default();
        paths_by_job
            .entry(row.job_id)
            .or_default()
            .push(PathRecord::new(row.label, boxes));
    }

    let mut jobs_by_segment: HashMap<DbId, Vec<CompletedJob>> = HashMap::new();
    for row in jobs {
        let paths = paths_by_job.remove(&row.id).unwrap_or_default();
        jobs_by_segment
            .entry(row.segment_id)
            .or_default()
            .push(CompletedJob::new(row.worker_id, paths));
    }

    let labels = labels.into_iter().map(Into::into).collect();
    let mut snapshot = VideoSnapshot::new(video.into_domain(labels));
    for row in &segments {
        let jobs = jobs_by_segment.remove(&row.id).unwrap_or_default();
        snapshot.push_segment(row.into(), jobs);
    }
    snapshot
}
