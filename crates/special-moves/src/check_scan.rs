//! Rook-line threat scan and the check marker.
//!
//! Only straight rays are walked, so bishop, queen and knight threats are
//! never found here. Whether a side is in check is the validator's call; the
//! scan decides which king gets highlighted after a castle.

use chess_core::{Board, BoardError, Cell, CellMarker, Color, Kind};

const RAYS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Walk the four rook rays out of `king_cell` and return the enemy rook that
/// is the nearest occupant of one of them.
pub fn scan_for_rook_threat(board: &Board, king_cell: Cell) -> Result<Option<Cell>, BoardError> {
    let king = board
        .piece_at(king_cell)
        .filter(|p| p.kind == Kind::King)
        .ok_or_else(|| BoardError::StateInconsistency(format!("no king on {king_cell}")))?;

    for (df, dr) in RAYS {
        let mut cursor = king_cell.offset(df, dr);
        while let Some(cell) = cursor {
            if let Some(occupant) = board.piece_at(cell) {
                if occupant.is(king.color.opposite(), Kind::Rook) {
                    return Ok(Some(cell));
                }
                break;
            }
            cursor = cell.offset(df, dr);
        }
    }
    Ok(None)
}

pub fn mark_check(board: &mut Board, king_cell: Cell) {
    board.mark(king_cell, CellMarker::Check);
}

/// Scan the `color` king and mark it when a rook is found.
pub fn scan_and_mark(board: &mut Board, color: Color) -> Result<Option<Cell>, BoardError> {
    let king_cell = board.find_king(color)?;
    let threat = scan_for_rook_threat(board, king_cell)?;
    if let Some(rook) = threat {
        tracing::debug!(king = %king_cell, rook = %rook, "Rook line check");
        mark_check(board, king_cell);
    }
    Ok(threat)
}

/// Highlight the `color` king after the validator reported check.
pub fn mark_king_in_check(board: &mut Board, color: Color) -> Result<Cell, BoardError> {
    let king_cell = board.find_king(color)?;
    mark_check(board, king_cell);
    Ok(king_cell)
}
