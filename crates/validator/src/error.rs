use chess_core::Cell;

/// Why a move request was turned down. Only logged; the client just sees
/// `move_valid: false`.
#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("no piece on {0}")]
    EmptyCell(Cell),

    #[error("{claimed} is not the piece on {cell}")]
    PieceMismatch { claimed: String, cell: Cell },

    #[error("illegal move {from}-{to}")]
    Illegal { from: Cell, to: Cell },

    #[error("promotion on {0} is still waiting for a piece")]
    PromotionPending(Cell),
}
