use serde::{Deserialize, Serialize};

/// Logical grid cell of one person: generation row and horizontal column.
///
/// Rows are integers growing downward from the oldest generation at zero.
/// Columns are fractional because parents are centered over their
/// children's span; the renderer scales both to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: i32,
    pub col: f32,
}

impl GridCoord {
    pub fn new(row: i32, col: f32) -> Self {
        Self { row, col }
    }
}
