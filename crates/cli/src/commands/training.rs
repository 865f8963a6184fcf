//! `vatic training`: turn a video into a training video.

use anyhow::{bail, Context};
use vatic_db::repositories::VideoRepo;
use vatic_db::DbPool;

use crate::cli::TrainingArgs;

pub async fn run(pool: &DbPool, args: &TrainingArgs) -> anyhow::Result<()> {
    let Some(update) = VideoRepo::mark_training(pool, &args.slug)
        .await
        .context("failed to mark video as training")?
    else {
        bail!("video '{}' does not exist", args.slug);
    };

    if update.was_training {
        tracing::warn!(slug = %args.slug, "Video is already a training video");
    }
    if update.published_jobs > 0 {
        tracing::warn!(
            slug = %args.slug,
            published = update.published_jobs,
            "Video already has published jobs; they must be taken down from the marketplace"
        );
    }
    tracing::info!(
        slug = %args.slug,
        withdrawn = update.jobs_withdrawn,
        "Video marked as training"
    );
    Ok(())
}
