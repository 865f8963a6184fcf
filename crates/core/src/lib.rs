//! Segment planning and tracklet reconstruction for crowd-sourced video
//! annotation.
//!
//! - [`planning`] cuts a video into overlapping work segments.
//! - [`tracklet`] turns completed jobs into whole-video tracklets.
//! - [`interpolation`] fills the frames between keyframed boxes.
//! - [`export`] writes tracklets as text, XML, JSON, MAT-file or pickle.

pub mod bbox;
pub mod error;
pub mod export;
pub mod frames;
pub mod interpolation;
pub mod planning;
pub mod snapshot;
pub mod tracklet;
pub mod types;
pub mod video;
