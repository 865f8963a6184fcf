//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod import_repo;
pub mod job_repo;
pub mod label_repo;
pub mod segment_repo;
pub mod video_repo;

pub use import_repo::{ImportRepo, ImportedVideo};
pub use job_repo::JobRepo;
pub use label_repo::LabelRepo;
pub use segment_repo::SegmentRepo;
pub use video_repo::{TrainingUpdate, VideoRepo};
