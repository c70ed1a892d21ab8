//! Applies accepted verdicts to the board.

use chess_core::{Board, BoardError, Cell, CellMarker, Color, MoveRequest, MoveVerdict, Piece};

use crate::castling::{self, CastleOutcome};
use crate::promotion::{PromotionChoice, PromotionFlow, PromotionOutcome, SuspendedPromotion};
use crate::{check_scan, checkmate, en_passant};

/// What a committed move did to the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveEffects {
    pub castled: Option<CastleOutcome>,
    pub captured: Option<Piece>,
    pub en_passant_captured: Option<Piece>,
    pub checked_king: Option<Cell>,
    pub winner: Option<Color>,
    pub promotions: Vec<Cell>,
}

/// The special-move rules the client runs locally, plus any open promotion.
#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    promotion: PromotionFlow,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_castle(&self, board: &Board, origin: Cell, destination: Cell) -> bool {
        castling::can_castle(board, origin, destination)
    }

    /// Play an accepted drop. The board must still show the position the
    /// request was made from.
    pub fn commit_move(
        &mut self,
        board: &mut Board,
        request: &MoveRequest,
        verdict: &MoveVerdict,
    ) -> Result<MoveEffects, BoardError> {
        let mut effects = MoveEffects::default();
        let origin = request.old_cell;
        let target = verdict.processed_cell;

        board.clear_marker(&CellMarker::DropZone);
        board.clear_marker(&CellMarker::Check);

        if castling::can_castle(board, origin, target) {
            effects.castled = Some(castling::castle_towards(board, origin, target)?);
        } else {
            effects.captured = board.relocate(origin, target)?;
        }

        if verdict.en_passant {
            effects.en_passant_captured =
                en_passant::apply_en_passant(board, target, request.piece_moved);
        }

        let mover = match effects.castled {
            Some(outcome) => board.piece_at(outcome.king_to),
            None => board.piece_at(target),
        }
        .map(|p| p.color)
        .unwrap_or(request.piece_moved.color);

        // A promoting move's check and mate depend on the piece still to be
        // chosen; they are applied once the choice is made.
        effects.promotions = self.promotion.begin_all(board, request);
        if effects.promotions.is_empty() {
            let (checked_king, winner) = apply_outcome(
                board,
                mover,
                verdict.check,
                verdict.checkmate,
                verdict.winner_color(),
            );
            effects.checked_king = checked_king;
            effects.winner = winner;
        }
        Ok(effects)
    }

    /// Pick the promotion offered on `candidate`. `check`/`mate` are the
    /// flags a verdict carried for this very choice, if one has been seen.
    pub fn complete_promotion(
        &mut self,
        board: &mut Board,
        candidate: Cell,
        check: bool,
        mate: bool,
        winner: Option<Color>,
    ) -> Result<PromotionOutcome, BoardError> {
        let outcome = self.promotion.select(board, candidate)?;
        apply_outcome(board, outcome.piece.color, check, mate, winner);
        Ok(outcome)
    }

    /// Settle check and mate from the verdict on a promotion choice. Any
    /// result posted at selection time is replaced by this one.
    pub fn apply_promotion_verdict(&self, board: &mut Board, piece: Piece, verdict: &MoveVerdict) {
        if !verdict.move_valid {
            return;
        }
        board.clear_marker(&CellMarker::Check);
        if !verdict.checkmate && !board.interaction_enabled() {
            tracing::info!("Checkmate withdrawn by the promotion verdict");
        }
        board.clear_result();
        apply_outcome(
            board,
            piece.color,
            verdict.check,
            verdict.checkmate,
            verdict.winner_color(),
        );
    }

    pub fn hover_promotion(&self, candidate: Cell) -> Option<MoveRequest> {
        self.promotion.hover(candidate)
    }

    pub fn promotion_choices(&self, origin: Cell) -> Option<&[PromotionChoice]> {
        self.promotion.choices(origin)
    }

    pub fn is_promotion_candidate(&self, cell: Cell) -> bool {
        self.promotion.handlers_at(cell).is_some()
    }

    pub fn has_pending_promotion(&self) -> bool {
        self.promotion.has_pending()
    }

    /// Withdraw open promotions, putting their pawns back. The returned
    /// flows can be offered again with [`RulesEngine::resume_promotions`].
    pub fn abandon_promotions(&mut self, board: &mut Board) -> Vec<SuspendedPromotion> {
        self.promotion.abandon_all(board)
    }

    pub fn resume_promotions(
        &mut self,
        board: &mut Board,
        suspended: Vec<SuspendedPromotion>,
    ) -> Vec<Cell> {
        self.promotion.resume(board, suspended)
    }
}

/// Mark check and announce mate for a move made by `mover`. A missing king
/// is logged and only skips the marker.
fn apply_outcome(
    board: &mut Board,
    mover: Color,
    check: bool,
    mate: bool,
    winner: Option<Color>,
) -> (Option<Cell>, Option<Color>) {
    let mut checked_king = None;
    if check || mate {
        match check_scan::mark_king_in_check(board, mover.opposite()) {
            Ok(cell) => checked_king = Some(cell),
            Err(e) => tracing::warn!(error = %e, "Could not mark king in check"),
        }
    }
    let mut announced = None;
    if mate {
        let color = winner.unwrap_or(mover);
        checkmate::announce(board, color);
        announced = Some(color);
    }
    (checked_king, announced)
}
