//! `vatic dump`: assemble, optionally interpolate, and export tracklets.

use std::io::{IsTerminal, Write};

use anyhow::{bail, Context};
use vatic_core::export::{self, ExportFormat};
use vatic_core::snapshot::SnapshotSource;
use vatic_core::tracklet::{assemble_tracklets, interpolate_all};
use vatic_db::{DbPool, PgSnapshotSource};

use crate::cli::DumpArgs;

pub async fn run(pool: &DbPool, args: &DumpArgs) -> anyhow::Result<()> {
    check_destination(
        args.format(),
        args.output.is_some(),
        std::io::stdout().is_terminal(),
    )?;

    let source = PgSnapshotSource::new(pool.clone());
    let bytes = render(&source, args).await?;

    match &args.output {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(&bytes).context("failed to write to stdout")?;
            out.flush()?;
        }
    }

    tracing::info!(
        slug = %args.slug,
        format = %args.format(),
        bytes = bytes.len(),
        "Annotations exported"
    );
    Ok(())
}

/// Refuse to print a binary encoding to a terminal.
pub fn check_destination(
    format: ExportFormat,
    to_file: bool,
    stdout_is_terminal: bool,
) -> anyhow::Result<()> {
    if format.is_binary() && !to_file && stdout_is_terminal {
        bail!("{format} output is binary; pass --output FILE or redirect stdout");
    }
    Ok(())
}

/// Produce the complete export document in memory.
///
/// Nothing is written anywhere until the whole document has been encoded,
/// so a failed export never leaves a truncated file behind.
pub async fn render<S>(source: &S, args: &DumpArgs) -> anyhow::Result<Vec<u8>>
where
    S: SnapshotSource + ?Sized,
{
    let tracklets = assemble_tracklets(source, &args.slug, args.dedup).await?;
    tracing::debug!(slug = %args.slug, tracklets = tracklets.len(), "Tracklets assembled");

    let tracklets = if args.interpolate {
        interpolate_all(&tracklets)
    } else {
        tracklets
    };

    export::export(&tracklets, args.format())
        .with_context(|| format!("failed to encode annotations as {}", args.format()))
}
