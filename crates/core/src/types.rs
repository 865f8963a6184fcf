/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Zero-based frame index within a video.
pub type FrameIndex = i32;
