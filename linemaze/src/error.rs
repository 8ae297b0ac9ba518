use thiserror::Error;

use crate::grid::Stage;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MazeError {
    #[error("Invalid maze size: {rows} rows, {cols} columns")]
    InvalidSize { rows: i64, cols: i64 },
    #[error("Invalid maze area: {width}x{height} with margins ({x}, {y})")]
    InvalidArea { width: f64, height: f64, x: f64, y: f64 },
    #[error("Exit ({row}, {col}) is outside of the {rows}x{cols} grid")]
    ExitOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Traversal got deeper than the limit of {limit} cells")]
    DepthExhausted { limit: usize },
    #[error("Cannot {action} a maze that is {stage}")]
    WrongStage { action: &'static str, stage: Stage },
}

impl MazeError {
    /// Whether the error comes from running out of a resource rather than
    /// from bad parameters. Raising the limit can help, retrying can't.
    pub fn is_resource(&self) -> bool {
        matches!(self, MazeError::DepthExhausted { .. })
    }
}
