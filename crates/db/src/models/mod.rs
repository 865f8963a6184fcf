//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts, where rows are created here

pub mod annotation_box;
pub mod job;
pub mod label;
pub mod segment;
pub mod video;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
