//! Move judging for one game. The board of record is a shakmaty position;
//! requests arrive in the client's cell/piece vocabulary and are matched
//! against the legal move list.

use chess_core::{Cell, Color, Kind, MoveRequest, MoveVerdict};
use shakmaty::{Chess, File, Move, Position, Rank, Role, Square};
use tracing::{debug, info};

use crate::error::JudgeError;

fn square(cell: Cell) -> Square {
    Square::from_coords(
        File::new(u32::from(cell.file_index())),
        Rank::new(u32::from(cell.rank()) - 1),
    )
}

fn role(kind: Kind) -> Role {
    match kind {
        Kind::Pawn => Role::Pawn,
        Kind::Knight => Role::Knight,
        Kind::Bishop => Role::Bishop,
        Kind::Rook => Role::Rook,
        Kind::Queen => Role::Queen,
        Kind::King => Role::King,
    }
}

fn side(color: Color) -> shakmaty::Color {
    match color {
        Color::White => shakmaty::Color::White,
        Color::Black => shakmaty::Color::Black,
    }
}

fn label(color: shakmaty::Color) -> &'static str {
    match color {
        shakmaty::Color::White => Color::White.label(),
        shakmaty::Color::Black => Color::Black.label(),
    }
}

/// A king dragged two or more files along its rank, towards the rook or
/// onto it.
fn castles_towards(king: Square, rook: Square, to: Square) -> bool {
    to.rank() == king.rank()
        && king.distance(to) >= 2
        && (rook.file() > king.file()) == (to.file() > king.file())
}

/// Judge for a single game session.
#[derive(Debug, Clone, Default)]
pub struct GameJudge {
    position: Chess,
    /// Pawn move accepted on drop whose piece has not been picked yet.
    pending_promotion: Option<(Square, Square)>,
}

impl GameJudge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Chess) -> Self {
        Self {
            position,
            pending_promotion: None,
        }
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn pending_promotion(&self) -> Option<(Square, Square)> {
        self.pending_promotion
    }

    /// Judge `request`. Commits advance the game; probes only report.
    pub fn judge(&mut self, request: &MoveRequest) -> MoveVerdict {
        let mut verdict = MoveVerdict::rejected(request.new_cell);
        verdict.seq = request.seq;

        let mv = match self.find_move(request) {
            Ok(mv) => mv,
            Err(e) => {
                debug!(error = %e, "Move rejected");
                return verdict;
            }
        };

        let mover = self.position.turn();
        let mut after = self.position.clone();
        after.play_unchecked(mv.clone());

        verdict.move_valid = true;
        verdict.check = after.is_check();
        verdict.checkmate = after.is_checkmate();
        verdict.en_passant = mv.is_en_passant();
        if verdict.checkmate {
            verdict.winner = Some(label(mover).to_string());
        }

        if request.is_commit() {
            if mv.is_promotion() && request.pawn_promoted_to.is_none() {
                // Judged as a queen until the client picks a piece.
                self.pending_promotion = Some((square(request.old_cell), square(request.new_cell)));
                debug!(cell = %request.new_cell, "Promotion pending");
            } else {
                self.position = after;
                self.pending_promotion = None;
                if verdict.checkmate {
                    info!(winner = label(mover), "Checkmate");
                }
            }
        }
        verdict
    }

    fn find_move(&self, request: &MoveRequest) -> Result<Move, JudgeError> {
        let from = square(request.old_cell);
        let to = square(request.new_cell);

        if let Some(pending) = self.pending_promotion {
            if request.is_commit() && pending != (from, to) {
                return Err(JudgeError::PromotionPending(request.new_cell));
            }
        }

        let on_board = self
            .position
            .board()
            .piece_at(from)
            .ok_or(JudgeError::EmptyCell(request.old_cell))?;
        let claimed = request.piece_moved;
        let mismatch = || JudgeError::PieceMismatch {
            claimed: claimed.code(),
            cell: request.old_cell,
        };
        if side(claimed.color) != on_board.color {
            return Err(mismatch());
        }

        // A pawn may be claimed as the piece it is about to become.
        let promotion = if on_board.role == Role::Pawn {
            match (request.pawn_promoted_to, claimed.kind) {
                (Some(chosen), _) => Some(role(chosen.kind)),
                (None, Kind::Pawn) => None,
                (None, kind) => Some(role(kind)),
            }
        } else if role(claimed.kind) != on_board.role {
            return Err(mismatch());
        } else {
            None
        };

        let legals = self.position.legal_moves();
        legals
            .iter()
            .find(|mv| match mv {
                Move::Normal {
                    from: f,
                    to: t,
                    promotion: p,
                    ..
                } => {
                    *f == from
                        && *t == to
                        && match p {
                            None => promotion.is_none(),
                            Some(r) => *r == promotion.unwrap_or(Role::Queen),
                        }
                }
                Move::EnPassant { from: f, to: t } => *f == from && *t == to,
                Move::Castle { king, rook } => *king == from && castles_towards(*king, *rook, to),
                _ => false,
            })
            .cloned()
            .ok_or(JudgeError::Illegal {
                from: request.old_cell,
                to: request.new_cell,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::EventType;
    use shakmaty::fen::Fen;
    use shakmaty::CastlingMode;

    fn request(piece: &str, from: &str, to: &str) -> MoveRequest {
        MoveRequest::probe(piece.parse().unwrap(), from.parse().unwrap(), to.parse().unwrap())
    }

    fn commit(piece: &str, from: &str, to: &str) -> MoveRequest {
        let mut r = request(piece, from, to);
        r.event_type = Some(EventType::Dragend);
        r
    }

    fn play(judge: &mut GameJudge, moves: &[(&str, &str, &str)]) {
        for (piece, from, to) in moves {
            let verdict = judge.judge(&commit(piece, from, to));
            assert!(verdict.move_valid, "{piece} {from}-{to} rejected");
        }
    }

    fn judge_from_fen(fen: &str) -> GameJudge {
        let fen: Fen = fen.parse().unwrap();
        GameJudge::from_position(fen.into_position(CastlingMode::Standard).unwrap())
    }

    #[test]
    fn test_opening_move() {
        let mut judge = GameJudge::new();
        let verdict = judge.judge(&commit("WP", "e2", "e4"));
        assert!(verdict.move_valid);
        assert!(!verdict.check);
        assert_eq!(verdict.processed_cell, "e4".parse().unwrap());
        assert_eq!(judge.position().turn(), shakmaty::Color::Black);
    }

    #[test]
    fn test_illegal_and_mismatched_moves() {
        let mut judge = GameJudge::new();
        assert!(!judge.judge(&commit("WP", "e2", "e5")).move_valid);
        assert!(!judge.judge(&commit("WH", "e2", "e4")).move_valid);
        assert!(!judge.judge(&commit("BP", "e7", "e5")).move_valid);
        assert!(!judge.judge(&commit("WP", "e3", "e4")).move_valid);
        assert_eq!(judge.position().turn(), shakmaty::Color::White);
    }

    #[test]
    fn test_probe_does_not_commit() {
        let mut judge = GameJudge::new();
        let mut probe = request("WH", "g1", "f3");
        probe.seq = Some(4);
        let verdict = judge.judge(&probe);
        assert!(verdict.move_valid);
        assert_eq!(verdict.seq, Some(4));
        assert_eq!(judge.position().turn(), shakmaty::Color::White);
    }

    #[test]
    fn test_castling_both_drop_targets() {
        let opening = [
            ("WP", "e2", "e4"),
            ("BP", "e7", "e5"),
            ("WH", "g1", "f3"),
            ("BH", "b8", "c6"),
            ("WB", "f1", "c4"),
            ("BH", "g8", "f6"),
        ];
        for target in ["g1", "h1"] {
            let mut judge = GameJudge::new();
            play(&mut judge, &opening);
            let verdict = judge.judge(&commit("WK", "e1", target));
            assert!(verdict.move_valid, "castle onto {target}");
            let board = judge.position().board();
            assert_eq!(board.role_at(Square::G1), Some(Role::King));
            assert_eq!(board.role_at(Square::F1), Some(Role::Rook));
        }
    }

    #[test]
    fn test_en_passant_flag() {
        let mut judge = GameJudge::new();
        play(
            &mut judge,
            &[
                ("WP", "e2", "e4"),
                ("BP", "a7", "a6"),
                ("WP", "e4", "e5"),
                ("BP", "d7", "d5"),
            ],
        );
        let verdict = judge.judge(&commit("WP", "e5", "d6"));
        assert!(verdict.move_valid);
        assert!(verdict.en_passant);
        assert_eq!(judge.position().board().piece_at(Square::D5), None);
    }

    #[test]
    fn test_checkmate_names_winner() {
        let mut judge = GameJudge::new();
        play(
            &mut judge,
            &[("WP", "f2", "f3"), ("BP", "e7", "e5"), ("WP", "g2", "g4")],
        );
        let verdict = judge.judge(&commit("BQ", "d8", "h4"));
        assert!(verdict.check);
        assert!(verdict.checkmate);
        assert_eq!(verdict.winner.as_deref(), Some("black"));
    }

    #[test]
    fn test_promotion_waits_for_choice() {
        let mut judge = judge_from_fen("8/2P5/8/8/8/8/k7/4K3 w - - 0 1");

        let verdict = judge.judge(&commit("WP", "c7", "c8"));
        assert!(verdict.move_valid);
        assert!(judge.pending_promotion().is_some());
        assert_eq!(judge.position().turn(), shakmaty::Color::White);

        // Nothing else may be committed meanwhile.
        assert!(!judge.judge(&commit("WK", "e1", "e2")).move_valid);

        // Hover probe with the candidate piece.
        assert!(judge.judge(&request("WH", "c7", "c8")).move_valid);

        let mut click = request("WH", "c7", "c8");
        click.event_type = Some(EventType::Click);
        click.pawn_promoted_to = Some("WH".parse().unwrap());
        assert!(judge.judge(&click).move_valid);
        assert_eq!(judge.pending_promotion(), None);
        assert_eq!(judge.position().board().role_at(Square::C8), Some(Role::Knight));
        assert_eq!(judge.position().turn(), shakmaty::Color::Black);
    }
}
