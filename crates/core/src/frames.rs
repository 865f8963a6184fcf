//! Decoded frame storage layout and discovery.
//!
//! Frames extracted from a video live in a two-level directory tree:
//! `<root>/<frame / 10000>/<frame / 100>/<frame>.jpg`. Import scans this
//! tree to learn the video's dimensions and frame count.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::FrameIndex;

/// File extension of stored frames.
pub const FRAME_EXTENSION: &str = "jpg";

/// Error type for frame storage probing.
#[derive(Debug, thiserror::Error)]
pub enum FrameStoreError {
    #[error("frame directory not found: {0}")]
    Missing(String),

    #[error("no frames found under {0}")]
    Empty(String),

    #[error("cannot read frame {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error(
        "first frame is {first_width}x{first_height} but last frame is {last_width}x{last_height}"
    )]
    DimensionMismatch {
        first_width: u32,
        first_height: u32,
        last_width: u32,
        last_height: u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What probing learned about a frame directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInventory {
    pub width: u32,
    pub height: u32,
    /// Highest frame index present on disk.
    pub total_frames: FrameIndex,
}

/// Path of `frame` under `root`.
pub fn frame_path(root: &Path, frame: FrameIndex) -> PathBuf {
    root.join((frame / 10_000).to_string())
        .join((frame / 100).to_string())
        .join(format!("{frame}.{FRAME_EXTENSION}"))
}

/// Scan a frame directory.
///
/// Reads the dimensions of frame 0, walks the numerically largest entry at
/// each directory level to find the last frame, and checks that the last
/// frame is readable and has the same dimensions as the first.
pub fn discover_frames(root: &Path) -> Result<FrameInventory, FrameStoreError> {
    if !root.is_dir() {
        return Err(FrameStoreError::Missing(root.display().to_string()));
    }

    let (width, height) = read_dimensions(&frame_path(root, 0))?;

    let empty = || FrameStoreError::Empty(root.display().to_string());
    let top = max_numeric_entry(root)?.ok_or_else(empty)?;
    let second_dir = root.join(top.to_string());
    let second = max_numeric_entry(&second_dir)?.ok_or_else(empty)?;
    let total_frames = max_numeric_entry(&second_dir.join(second.to_string()))?.ok_or_else(empty)?;

    let (last_width, last_height) = read_dimensions(&frame_path(root, total_frames))?;
    if (last_width, last_height) != (width, height) {
        return Err(FrameStoreError::DimensionMismatch {
            first_width: width,
            first_height: height,
            last_width,
            last_height,
        });
    }

    Ok(FrameInventory {
        width,
        height,
        total_frames,
    })
}

/// Largest entry in `dir` whose name (minus extension) parses as a frame index.
fn max_numeric_entry(dir: &Path) -> Result<Option<FrameIndex>, FrameStoreError> {
    let mut max = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let index = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<FrameIndex>().ok());
        if let Some(index) = index {
            max = max.max(Some(index));
        }
    }
    Ok(max)
}

fn read_dimensions(path: &Path) -> Result<(u32, u32), FrameStoreError> {
    image::image_dimensions(path).map_err(|e| FrameStoreError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
