//! Pawn promotion: the pawn leaves the board, four candidate cells stacked
//! from its cell towards its own side offer queen, knight, rook and bishop,
//! and the first selection places the piece and produces the request that
//! reports the choice.

use std::collections::{BTreeMap, HashMap};

use chess_core::{Board, BoardError, Cell, CellMarker, Color, EventType, Kind, MoveRequest, Piece};

/// Offer order, starting on the pawn's own cell.
pub const PROMOTION_KINDS: [Kind; 4] = [Kind::Queen, Kind::Knight, Kind::Rook, Kind::Bishop];

/// Input handlers bound to a candidate cell while a flow is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateHandler {
    Select,
    Hover,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionChoice {
    /// e.g. "black-queen"
    pub label: String,
    pub piece: Piece,
    pub cell: Cell,
}

impl PromotionChoice {
    fn new(color: Color, kind: Kind, cell: Cell) -> Self {
        Self {
            label: format!("{}-{}", color.label(), kind.label()),
            piece: Piece::new(color, kind),
            cell,
        }
    }

    fn marker(&self) -> CellMarker {
        CellMarker::Promotion(self.label.clone())
    }
}

#[derive(Debug, Clone)]
struct PendingPromotion {
    pawn: Piece,
    choices: Vec<PromotionChoice>,
    hidden: Vec<Cell>,
    request: MoveRequest,
}

/// Result of picking a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromotionOutcome {
    pub placed: Cell,
    pub piece: Piece,
    /// The originating move with the chosen piece filled in, ready to send.
    pub request: MoveRequest,
}

/// A flow taken off the board, kept so it can be offered again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspendedPromotion {
    pub cell: Cell,
    pub request: MoveRequest,
}

/// Every promotion currently waiting for a choice, keyed by the cell the
/// pawn reached.
#[derive(Debug, Clone, Default)]
pub struct PromotionFlow {
    pending: BTreeMap<Cell, PendingPromotion>,
    handlers: HashMap<Cell, (Cell, [CandidateHandler; 2])>,
}

/// Pawns standing on the rank they promote on.
pub fn detect(board: &Board) -> Vec<Cell> {
    board
        .pieces()
        .filter(|(cell, piece)| {
            piece.kind == Kind::Pawn && cell.rank() == piece.color.promotion_rank()
        })
        .map(|(cell, _)| cell)
        .collect()
}

fn direction(color: Color) -> i8 {
    match color {
        Color::Black => 1,
        Color::White => -1,
    }
}

impl PromotionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a flow for the pawn on `cell`. `request` is the move that got it
    /// there. Fails without touching the board when the cell has no
    /// promoting pawn or a flow already owns the cell or its candidates.
    pub fn begin(
        &mut self,
        board: &mut Board,
        cell: Cell,
        request: MoveRequest,
    ) -> Result<Vec<PromotionChoice>, BoardError> {
        if self.pending.contains_key(&cell) {
            return Err(BoardError::StateInconsistency(format!(
                "promotion already pending on {cell}"
            )));
        }

        let pawn = board
            .piece_at(cell)
            .filter(|p| p.kind == Kind::Pawn && p.color.promotion_rank() == cell.rank())
            .ok_or_else(|| {
                BoardError::StateInconsistency(format!("no promoting pawn on {cell}"))
            })?;

        let step = direction(pawn.color);
        let mut choices = Vec::with_capacity(PROMOTION_KINDS.len());
        for (i, kind) in PROMOTION_KINDS.iter().enumerate() {
            let target = cell.offset(0, step * i as i8).ok_or_else(|| {
                BoardError::StateInconsistency(format!("promotion candidates run off the board at {cell}"))
            })?;
            if self.handlers.contains_key(&target) {
                return Err(BoardError::StateInconsistency(format!(
                    "promotion candidate {target} is already bound"
                )));
            }
            choices.push(PromotionChoice::new(pawn.color, *kind, target));
        }

        board.remove(cell);
        let mut hidden = Vec::new();
        for choice in &choices {
            if choice.cell != cell && board.hide(choice.cell) {
                hidden.push(choice.cell);
            }
            board.mark(choice.cell, choice.marker());
            self.handlers.insert(
                choice.cell,
                (cell, [CandidateHandler::Select, CandidateHandler::Hover]),
            );
        }

        tracing::debug!(cell = %cell, pawn = %pawn, "Promotion pending");
        self.pending.insert(
            cell,
            PendingPromotion {
                pawn,
                choices: choices.clone(),
                hidden,
                request,
            },
        );
        Ok(choices)
    }

    /// Start flows for every promoting pawn on the board. Cells that cannot
    /// start are logged and skipped.
    pub fn begin_all(&mut self, board: &mut Board, request: &MoveRequest) -> Vec<Cell> {
        let mut started = Vec::new();
        for cell in detect(board) {
            match self.begin(board, cell, request.clone()) {
                Ok(_) => started.push(cell),
                Err(e) => tracing::warn!(cell = %cell, error = %e, "Promotion not started"),
            }
        }
        started
    }

    /// Finish the flow owning `candidate` with the piece offered there.
    pub fn select(
        &mut self,
        board: &mut Board,
        candidate: Cell,
    ) -> Result<PromotionOutcome, BoardError> {
        let origin = self.origin_of(candidate)?;
        let pending = self.pending.remove(&origin).ok_or_else(|| {
            BoardError::StateInconsistency(format!("no promotion pending on {origin}"))
        })?;

        self.detach(board, &pending);

        let choice = pending
            .choices
            .iter()
            .find(|c| c.cell == candidate)
            .ok_or_else(|| {
                BoardError::StateInconsistency(format!("{candidate} is not a promotion candidate"))
            })?;

        let placed = choice
            .cell
            .with_rank(choice.piece.color.promotion_rank())
            .ok_or_else(|| BoardError::InvalidCell(choice.cell.to_string()))?;
        board.place(placed, choice.piece);

        let mut request = pending.request;
        request.piece_moved = choice.piece;
        request.pawn_promoted_to = Some(choice.piece);
        request.event_type = Some(EventType::Click);

        tracing::info!(cell = %placed, piece = %choice.piece, "Promoted");
        Ok(PromotionOutcome {
            placed,
            piece: choice.piece,
            request,
        })
    }

    /// Probe for hovering `candidate`: the originating move, uncommitted,
    /// with the offered piece as the mover.
    pub fn hover(&self, candidate: Cell) -> Option<MoveRequest> {
        let (origin, _) = self.handlers.get(&candidate)?;
        let pending = self.pending.get(origin)?;
        let choice = pending.choices.iter().find(|c| c.cell == candidate)?;
        let mut request = pending.request.clone();
        request.event_type = None;
        request.piece_moved = choice.piece;
        Some(request)
    }

    /// Drop every pending flow and put the pawns back.
    pub fn abandon_all(&mut self, board: &mut Board) -> Vec<SuspendedPromotion> {
        let pending = std::mem::take(&mut self.pending);
        let mut suspended = Vec::with_capacity(pending.len());
        for (origin, flow) in pending {
            self.detach(board, &flow);
            board.place(origin, flow.pawn);
            suspended.push(SuspendedPromotion {
                cell: origin,
                request: flow.request,
            });
        }
        suspended
    }

    /// Offer suspended flows again. Pawns no longer on their promotion cell
    /// are logged and skipped.
    pub fn resume(&mut self, board: &mut Board, suspended: Vec<SuspendedPromotion>) -> Vec<Cell> {
        let mut resumed = Vec::new();
        for SuspendedPromotion { cell, request } in suspended {
            match self.begin(board, cell, request) {
                Ok(_) => resumed.push(cell),
                Err(e) => tracing::warn!(cell = %cell, error = %e, "Promotion not resumed"),
            }
        }
        resumed
    }

    fn detach(&mut self, board: &mut Board, pending: &PendingPromotion) {
        for choice in &pending.choices {
            self.handlers.remove(&choice.cell);
            board.unmark(choice.cell, &choice.marker());
        }
        for cell in &pending.hidden {
            board.reveal(*cell);
        }
    }

    fn origin_of(&self, candidate: Cell) -> Result<Cell, BoardError> {
        self.handlers
            .get(&candidate)
            .map(|(origin, _)| *origin)
            .ok_or_else(|| {
                BoardError::StateInconsistency(format!("no promotion candidate on {candidate}"))
            })
    }

    pub fn handlers_at(&self, cell: Cell) -> Option<&[CandidateHandler; 2]> {
        self.handlers.get(&cell).map(|(_, h)| h)
    }

    pub fn is_pending(&self, cell: Cell) -> bool {
        self.pending.contains_key(&cell)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn choices(&self, origin: Cell) -> Option<&[PromotionChoice]> {
        self.pending.get(&origin).map(|p| p.choices.as_slice())
    }
}
