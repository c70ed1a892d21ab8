use chess_core::{Board, Cell, Color, Piece};

/// Cell of the pawn taken en passant when `mover` lands on `processed`.
pub fn capture_cell(processed: Cell, mover: Color) -> Option<Cell> {
    let direction = match mover {
        Color::Black => 1,
        Color::White => -1,
    };
    processed.offset(0, direction)
}

/// Remove the pawn captured en passant. An empty or off-board capture cell
/// is logged and leaves the board as it was.
pub fn apply_en_passant(board: &mut Board, processed: Cell, mover: Piece) -> Option<Piece> {
    let Some(target) = capture_cell(processed, mover.color) else {
        tracing::warn!(cell = %processed, mover = %mover, "En passant capture cell is off the board");
        return None;
    };
    let captured = board.remove(target);
    match captured {
        Some(piece) => tracing::debug!(cell = %target, piece = %piece, "En passant capture"),
        None => tracing::warn!(cell = %target, mover = %mover, "En passant capture cell is empty"),
    }
    captured
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Cell {
        s.parse().unwrap()
    }

    #[test]
    fn test_black_capture_sits_above() {
        let mut board = Board::from_placements(&[("a2", "BP"), ("a3", "WP"), ("b3", "WP")]).unwrap();
        let removed = apply_en_passant(&mut board, cell("a2"), "BP".parse().unwrap());
        assert_eq!(removed.map(|p| p.code()), Some("WP".to_string()));
        assert!(!board.is_occupied(cell("a3")));
        assert!(board.is_occupied(cell("b3")));
        assert!(board.is_occupied(cell("a2")));
    }

    #[test]
    fn test_white_capture_sits_below() {
        let mut board = Board::from_placements(&[("d6", "WP"), ("d5", "BP")]).unwrap();
        apply_en_passant(&mut board, cell("d6"), "WP".parse().unwrap());
        assert!(!board.is_occupied(cell("d5")));
        assert_eq!(board.pieces().count(), 1);
    }

    #[test]
    fn test_empty_target_is_noop() {
        let mut board = Board::from_placements(&[("d6", "WP")]).unwrap();
        let before = board.clone();
        assert_eq!(apply_en_passant(&mut board, cell("d6"), "WP".parse().unwrap()), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_off_board_target() {
        assert_eq!(capture_cell(cell("c8"), Color::Black), None);
        assert_eq!(capture_cell(cell("c1"), Color::White), None);
    }
}
