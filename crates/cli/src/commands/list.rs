//! `vatic list`: print every video slug.

use std::io::Write;

use anyhow::Context;
use vatic_db::repositories::VideoRepo;
use vatic_db::DbPool;

pub async fn run(pool: &DbPool) -> anyhow::Result<()> {
    let videos = VideoRepo::list(pool).await.context("failed to list videos")?;

    let mut out = std::io::stdout().lock();
    write_slugs(&mut out, videos.iter().map(|v| v.slug.as_str()))?;
    tracing::debug!(count = videos.len(), "Listed videos");
    Ok(())
}

/// One slug per line, nothing else.
pub fn write_slugs<'a, W: Write>(
    out: &mut W,
    slugs: impl IntoIterator<Item = &'a str>,
) -> std::io::Result<()> {
    for slug in slugs {
        writeln!(out, "{slug}")?;
    }
    out.flush()
}
