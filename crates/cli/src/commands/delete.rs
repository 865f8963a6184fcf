//! `vatic delete`: remove a video and its annotations.

use anyhow::{bail, Context};
use vatic_db::repositories::VideoRepo;
use vatic_db::DbPool;

use crate::cli::DeleteArgs;

pub async fn run(pool: &DbPool, args: &DeleteArgs) -> anyhow::Result<()> {
    if !VideoRepo::exists(pool, &args.slug)
        .await
        .context("failed to look up video")?
    {
        bail!("video '{}' does not exist", args.slug);
    }

    let paths = VideoRepo::count_paths(pool, &args.slug)
        .await
        .context("failed to count annotations")?;
    if paths > 0 && !args.force {
        bail!(
            "video '{}' has {paths} annotated paths; pass --force to delete anyway",
            args.slug
        );
    }

    VideoRepo::delete(pool, &args.slug)
        .await
        .context("failed to delete video")?;

    tracing::info!(slug = %args.slug, paths, "Video deleted");
    Ok(())
}
