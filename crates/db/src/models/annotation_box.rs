//! Annotation box entity model.

use serde::Serialize;
use sqlx::FromRow;
use vatic_core::bbox::FrameBox;
use vatic_core::types::DbId;

/// A row from the `boxes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnnotationBox {
    pub id: DbId,
    pub path_id: DbId,
    pub frame: i32,
    pub xtl: f64,
    pub ytl: f64,
    pub xbr: f64,
    pub ybr: f64,
    pub lost: bool,
    pub occluded: bool,
}

impl From<&AnnotationBox> for FrameBox {
    fn from(row: &AnnotationBox) -> Self {
        FrameBox::new(row.frame, row.xtl, row.ytl, row.xbr, row.ybr)
            .with_lost(row.lost)
            .with_occluded(row.occluded)
    }
}
