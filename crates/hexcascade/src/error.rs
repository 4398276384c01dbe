//! The closed error taxonomy for save/restore. Everything else in the
//! engine is `Option`-based per the error-handling design: geometry and
//! board accessors return `None` on bad coordinates rather than erroring.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RestoreError {
    #[error("saved grid is {found_cols}x{found_rows}, expected {expected_cols}x{expected_rows}")]
    DimensionMismatch {
        expected_cols: usize,
        expected_rows: usize,
        found_cols: usize,
        found_rows: usize,
    },
    #[error("cell at ({col},{row}) has invalid color {color}")]
    InvalidColor { col: usize, row: usize, color: i8 },
    #[error("cell at ({col},{row}) is tagged as a bomb but carries no timer")]
    BombMissingTimer { col: usize, row: usize },
    #[error("cell at ({col},{row}) names an unknown special tag")]
    UnknownSpecial { col: usize, row: usize },
}
