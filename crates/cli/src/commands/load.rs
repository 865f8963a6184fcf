//! `vatic load`: inspect frames, plan segments, import.

use anyhow::{bail, Context};
use vatic_core::error::CoreError;
use vatic_core::frames::{self, FrameInventory};
use vatic_core::planning::{plan_segments, SegmentRange};
use vatic_db::models::video::CreateVideo;
use vatic_db::repositories::{ImportRepo, VideoRepo};
use vatic_db::DbPool;

use crate::cli::LoadArgs;
use crate::config::CliConfig;

/// Everything written by one import.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub video: CreateVideo,
    pub labels: Vec<String>,
    pub segments: Vec<SegmentRange>,
}

pub async fn run(pool: &DbPool, config: &CliConfig, args: &LoadArgs) -> anyhow::Result<()> {
    if VideoRepo::exists(pool, &args.slug)
        .await
        .context("failed to look up video")?
    {
        return Err(CoreError::Conflict(format!("video '{}' already exists", args.slug)).into());
    }

    let inventory = frames::discover_frames(&args.location)
        .with_context(|| format!("failed to read frames in {}", args.location.display()))?;
    tracing::info!(
        slug = %args.slug,
        width = inventory.width,
        height = inventory.height,
        total_frames = inventory.total_frames,
        "Frame directory scanned"
    );

    if let Some(trainer) = &args.trainer {
        check_trainer(pool, trainer).await?;
    }

    let location = std::fs::canonicalize(&args.location)
        .with_context(|| format!("failed to resolve {}", args.location.display()))?;
    let plan = plan_import(args, config, &inventory, location.display().to_string())?;

    let imported = ImportRepo::import_video(pool, &plan.video, &plan.labels, &plan.segments)
        .await
        .context("failed to import video")?;

    tracing::info!(
        slug = %imported.video.slug,
        labels = imported.label_count,
        segments = imported.segment_count,
        "Video imported"
    );
    Ok(())
}

async fn check_trainer(pool: &DbPool, slug: &str) -> anyhow::Result<()> {
    let trainer = VideoRepo::find_by_slug(pool, slug)
        .await
        .context("failed to look up training video")?;
    match trainer {
        None => bail!("training video '{slug}' does not exist"),
        Some(video) if !video.is_training => {
            bail!("video '{slug}' is not a training video")
        }
        Some(_) => Ok(()),
    }
}

/// Turn arguments and discovered frames into the rows to insert.
///
/// Labels are trimmed and de-duplicated keeping first occurrence order.
pub fn plan_import(
    args: &LoadArgs,
    config: &CliConfig,
    inventory: &FrameInventory,
    location: String,
) -> Result<ImportPlan, CoreError> {
    if args.skip < 0 {
        return Err(CoreError::Validation(format!(
            "skip must be >= 0, got {}",
            args.skip
        )));
    }

    let mut labels: Vec<String> = Vec::with_capacity(args.labels.len());
    for label in &args.labels {
        let label = label.trim();
        if !label.is_empty() && !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    if labels.is_empty() {
        return Err(CoreError::Validation("at least one label is required".into()));
    }

    let dimension = |value: u32| {
        i32::try_from(value)
            .map_err(|_| CoreError::Validation(format!("frame dimension {value} is too large")))
    };

    let length = args.length.unwrap_or(config.segment_length);
    let overlap = args.overlap.unwrap_or(config.segment_overlap);
    let segments = plan_segments(inventory.total_frames, length, overlap)?;

    Ok(ImportPlan {
        video: CreateVideo {
            slug: args.slug.clone(),
            location,
            width: dimension(inventory.width)?,
            height: dimension(inventory.height)?,
            total_frames: inventory.total_frames,
            skip: args.skip,
            training_video_slug: args.trainer.clone(),
        },
        labels,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::path::PathBuf;

    fn config() -> CliConfig {
        CliConfig {
            database_url: "postgres://localhost/vatic".into(),
            db_max_connections: 5,
            segment_length: 300,
            segment_overlap: 20,
        }
    }

    fn args(labels: &[&str]) -> LoadArgs {
        LoadArgs {
            slug: "street".into(),
            location: PathBuf::from("/frames/street"),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            length: None,
            overlap: None,
            skip: 0,
            trainer: None,
        }
    }

    const INVENTORY: FrameInventory = FrameInventory {
        width: 720,
        height: 480,
        total_frames: 650,
    };

    #[test]
    fn uses_configured_plan_by_default() {
        let plan = plan_import(&args(&["car"]), &config(), &INVENTORY, "/abs".into()).unwrap();
        let ranges: Vec<(i32, i32)> = plan.segments.iter().map(|s| (s.start, s.stop)).collect();
        assert_eq!(ranges, vec![(0, 321), (300, 621), (600, 650)]);
        assert_eq!(plan.video.width, 720);
        assert_eq!(plan.video.total_frames, 650);
        assert_eq!(plan.video.location, "/abs");
    }

    #[test]
    fn arguments_override_configured_plan() {
        let mut args = args(&["car"]);
        args.length = Some(100);
        args.overlap = Some(0);
        args.trainer = Some("practice".into());
        let plan = plan_import(&args, &config(), &INVENTORY, "/abs".into()).unwrap();
        assert_eq!(plan.segments.len(), 7);
        assert_eq!(plan.segments[0].stop, 101);
        assert_eq!(plan.video.training_video_slug.as_deref(), Some("practice"));
    }

    #[test]
    fn labels_are_trimmed_and_deduplicated() {
        let plan = plan_import(
            &args(&["car", " person ", "car", ""]),
            &config(),
            &INVENTORY,
            "/abs".into(),
        )
        .unwrap();
        assert_eq!(plan.labels, vec!["car", "person"]);
    }

    #[test]
    fn rejects_blank_labels_and_bad_parameters() {
        assert_matches!(
            plan_import(&args(&[" "]), &config(), &INVENTORY, "/abs".into()),
            Err(CoreError::Validation(_))
        );

        let mut bad = args(&["car"]);
        bad.length = Some(0);
        assert_matches!(
            plan_import(&bad, &config(), &INVENTORY, "/abs".into()),
            Err(CoreError::Validation(_))
        );

        let mut bad = args(&["car"]);
        bad.skip = -1;
        assert_matches!(
            plan_import(&bad, &config(), &INVENTORY, "/abs".into()),
            Err(CoreError::Validation(_))
        );
    }
}
