//! Board error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid cell code: {0:?}")]
    InvalidCell(String),

    #[error("Invalid piece code: {0:?}")]
    InvalidPiece(String),

    /// Local board contents disagree with what an operation expected.
    #[error("State inconsistency: {0}")]
    StateInconsistency(String),
}
