//! Castling: local eligibility before a drop is sent, and the paired
//! king + rook relocation once the validator accepts it.

use std::cmp::Ordering;

use chess_core::{Board, BoardError, Cell, Kind};

use crate::check_scan;

/// Files a castling king may be dropped on: its landing square or its rook.
pub const LANDING_FILES: [char; 4] = ['a', 'c', 'g', 'h'];

/// File the king castles from.
pub const KING_HOME_FILE: char = 'e';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// Where each piece goes for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlePlan {
    pub rook_from: char,
    pub king_to: char,
    pub rook_to: char,
}

impl CastleSide {
    /// Side implied by dragging from `origin` to `destination`. This is the
    /// only place direction is decided; eligibility and execution share it.
    pub fn between(origin: Cell, destination: Cell) -> Option<CastleSide> {
        match destination.file_index().cmp(&origin.file_index()) {
            Ordering::Greater => Some(CastleSide::Kingside),
            Ordering::Less => Some(CastleSide::Queenside),
            Ordering::Equal => None,
        }
    }

    pub fn plan(self) -> CastlePlan {
        match self {
            CastleSide::Kingside => CastlePlan {
                rook_from: 'h',
                king_to: 'g',
                rook_to: 'f',
            },
            CastleSide::Queenside => CastlePlan {
                rook_from: 'a',
                king_to: 'c',
                rook_to: 'd',
            },
        }
    }

    /// Files between king and rook that must be empty.
    fn transit_files(self) -> &'static [char] {
        match self {
            CastleSide::Kingside => &['f', 'g'],
            CastleSide::Queenside => &['b', 'c', 'd'],
        }
    }
}

fn is_back_rank(rank: u8) -> bool {
    rank == 1 || rank == 8
}

/// Whether dragging the piece on `origin` to `destination` is a castling
/// attempt the client should execute as one. Pure; reads the board only.
pub fn can_castle(board: &Board, origin: Cell, destination: Cell) -> bool {
    if !LANDING_FILES.contains(&destination.file()) {
        return false;
    }

    let Some(piece) = board.piece_at(origin) else {
        return false;
    };
    if piece.kind != Kind::King {
        return false;
    }

    if let Some(side) = CastleSide::between(origin, destination) {
        let blocked = side.transit_files().iter().any(|&file| {
            Cell::new(file, origin.rank())
                .map(|cell| board.is_occupied(cell))
                .unwrap_or(true)
        });
        if blocked {
            return false;
        }
    }

    is_back_rank(origin.rank())
        && is_back_rank(destination.rank())
        && origin.rank() == destination.rank()
        && origin.file_index().abs_diff(destination.file_index()) >= 2
}

/// Cells touched by a completed castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleOutcome {
    pub king_to: Cell,
    pub rook_to: Cell,
    /// Enemy rook found checking the opposing king after the move.
    pub rook_threat: Option<Cell>,
}

/// Move the king from the e-file and the rook from `plan.rook_from` on
/// `rank`. Both must be present; otherwise nothing is touched.
pub fn castle(board: &mut Board, rank: u8, plan: CastlePlan) -> Result<CastleOutcome, BoardError> {
    let king_from = Cell::new(KING_HOME_FILE, rank)?;
    let rook_from = Cell::new(plan.rook_from, rank)?;
    let king_to = Cell::new(plan.king_to, rank)?;
    let rook_to = Cell::new(plan.rook_to, rank)?;

    let king = board.piece_at(king_from).ok_or_else(|| {
        BoardError::StateInconsistency(format!("castling without a king on {king_from}"))
    })?;
    let rook = board.piece_at(rook_from).ok_or_else(|| {
        BoardError::StateInconsistency(format!("castling without a rook on {rook_from}"))
    })?;

    board.remove(rook_from);
    board.remove(king_from);
    board.place(king_to, king);
    board.place(rook_to, rook);

    let rook_threat = match check_scan::scan_and_mark(board, king.color.opposite()) {
        Ok(threat) => threat,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping check scan after castling");
            None
        }
    };

    Ok(CastleOutcome {
        king_to,
        rook_to,
        rook_threat,
    })
}

/// Castle for a drag from `origin` to `destination`, picking the side from
/// the drag direction.
pub fn castle_towards(
    board: &mut Board,
    origin: Cell,
    destination: Cell,
) -> Result<CastleOutcome, BoardError> {
    let side = CastleSide::between(origin, destination).ok_or_else(|| {
        BoardError::StateInconsistency(format!("no castling direction from {origin} to {destination}"))
    })?;
    castle(board, origin.rank(), side.plan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::CellMarker;

    fn cell(s: &str) -> Cell {
        s.parse().unwrap()
    }

    fn board(placements: &[(&str, &str)]) -> Board {
        Board::from_placements(placements).unwrap()
    }

    #[test]
    fn test_truth_table() {
        let open = board(&[("e1", "WK"), ("a1", "WR"), ("h1", "WR"), ("e8", "BK"), ("h8", "BR")]);
        let cases: &[(&Board, &str, &str, bool)] = &[
            (&open, "e1", "g1", true),
            (&open, "e1", "h1", true),
            (&open, "e1", "c1", true),
            (&open, "e1", "a1", true),
            (&open, "e8", "g8", true),
            // landing file not allowed
            (&open, "e1", "f1", false),
            (&open, "e1", "d1", false),
            (&open, "e1", "b1", false),
            // empty origin
            (&open, "d1", "g1", false),
            // not a king
            (&open, "h1", "c1", false),
            // leaves the back rank
            (&open, "e1", "g2", false),
            (&open, "e1", "g8", false),
        ];
        for (b, from, to, expected) in cases {
            assert_eq!(can_castle(b, cell(from), cell(to)), *expected, "{from} -> {to}");
        }
    }

    #[test]
    fn test_blocked_paths() {
        let kingside = board(&[("e1", "WK"), ("g1", "WH"), ("h1", "WR"), ("a1", "WR")]);
        assert!(!can_castle(&kingside, cell("e1"), cell("g1")));
        assert!(can_castle(&kingside, cell("e1"), cell("c1")));

        // b-file counts on the queenside even though the king never crosses it
        let queenside = board(&[("e1", "WK"), ("b1", "WH"), ("a1", "WR")]);
        assert!(!can_castle(&queenside, cell("e1"), cell("c1")));

        let enemy_on_f = board(&[("e8", "BK"), ("f8", "WB"), ("h8", "BR")]);
        assert!(!can_castle(&enemy_on_f, cell("e8"), cell("g8")));
    }

    #[test]
    fn test_king_off_back_rank_never_castles() {
        let mut b = Board::empty();
        b.place(cell("e4"), "WK".parse().unwrap());
        for to in Cell::all() {
            assert!(!can_castle(&b, cell("e4"), to), "e4 -> {to}");
        }
    }

    #[test]
    fn test_every_true_result_meets_all_conditions() {
        let b = board(&[("e1", "WK"), ("e8", "BK"), ("d8", "BQ")]);
        for from in Cell::all() {
            for to in Cell::all() {
                if !can_castle(&b, from, to) {
                    continue;
                }
                assert!(LANDING_FILES.contains(&to.file()));
                assert_eq!(b.piece_at(from).map(|p| p.kind), Some(Kind::King));
                assert!(is_back_rank(from.rank()) && from.rank() == to.rank());
                assert!(from.file_index().abs_diff(to.file_index()) >= 2);
            }
        }
        // queen on d8 blocks black's long side only
        assert!(!can_castle(&b, cell("e8"), cell("c8")));
        assert!(can_castle(&b, cell("e8"), cell("g8")));
    }

    #[test]
    fn test_kingside_castle_moves_both_pieces() {
        let mut b = board(&[("e1", "WK"), ("h1", "WR"), ("e8", "BK")]);
        assert!(can_castle(&b, cell("e1"), cell("g1")));

        let outcome = castle_towards(&mut b, cell("e1"), cell("g1")).unwrap();
        assert_eq!(outcome.king_to, cell("g1"));
        assert_eq!(outcome.rook_to, cell("f1"));
        assert_eq!(b.piece_at(cell("g1")).unwrap().code(), "WK");
        assert_eq!(b.piece_at(cell("f1")).unwrap().code(), "WR");
        assert!(!b.is_occupied(cell("e1")));
        assert!(!b.is_occupied(cell("h1")));
        assert_eq!(outcome.rook_threat, None);
    }

    #[test]
    fn test_queenside_castle_from_rook_drop() {
        let mut b = board(&[("e8", "BK"), ("a8", "BR"), ("e1", "WK")]);
        let outcome = castle_towards(&mut b, cell("e8"), cell("a8")).unwrap();
        assert_eq!(b.piece_at(cell("c8")).unwrap().code(), "BK");
        assert_eq!(b.piece_at(cell("d8")).unwrap().code(), "BR");
        assert_eq!(outcome.rook_to, cell("d8"));
    }

    #[test]
    fn test_castle_scans_for_rook_check() {
        // rook lands on f1 and looks straight up the f-file at the black king
        let mut b = board(&[("e1", "WK"), ("h1", "WR"), ("f8", "BK")]);
        let outcome = castle_towards(&mut b, cell("e1"), cell("g1")).unwrap();
        assert_eq!(outcome.rook_threat, Some(cell("f1")));
        assert!(b.has_marker(cell("f8"), &CellMarker::Check));
    }

    #[test]
    fn test_missing_rook_mutates_nothing() {
        let mut b = board(&[("e1", "WK"), ("e8", "BK")]);
        let before = b.clone();
        let err = castle(&mut b, 1, CastleSide::Kingside.plan()).unwrap_err();
        assert!(matches!(err, BoardError::StateInconsistency(_)));
        assert_eq!(b, before);
    }

    #[test]
    fn test_missing_king_mutates_nothing() {
        let mut b = board(&[("d1", "WK"), ("a1", "WR")]);
        let before = b.clone();
        assert!(castle(&mut b, 1, CastleSide::Queenside.plan()).is_err());
        assert_eq!(b, before);
    }

    #[test]
    fn test_side_between() {
        assert_eq!(CastleSide::between(cell("e1"), cell("h1")), Some(CastleSide::Kingside));
        assert_eq!(CastleSide::between(cell("e1"), cell("c1")), Some(CastleSide::Queenside));
        assert_eq!(CastleSide::between(cell("e1"), cell("e8")), None);
    }
}
