//! The per-gesture request/verdict state machine.
//!
//! Every request gets a sequence number. Verdicts are matched by the echoed
//! number when the validator sends one and in send order otherwise. Probe
//! verdicts (drop-zone previews, promotion hovers) and commit verdicts (drops,
//! promotion choices) are tracked separately; a verdict answering anything
//! but the newest request of its channel is dropped.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use chess_core::{Board, Cell, CellMarker, EventType, Kind, MoveRequest, MoveVerdict, Piece};
use special_moves::engine::MoveEffects;
use special_moves::RulesEngine;
use tracing::{debug, error, info, warn};

use crate::error::ClientError;
use crate::gesture::Gesture;
use crate::session::GameSession;
use crate::store::SnapshotStore;
use crate::transport::MoveTransport;

/// Choreographer state. Resolved and aborted requests are not kept as
/// states of their own: a commit verdict returns to `Idle` once applied, and
/// a failed send never enters `AwaitingVerdict`, so the phase is left as it
/// was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A drop or promotion choice is waiting for its verdict.
    AwaitingVerdict { seq: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Probe,
    Drop,
    Promotion,
    PromotionProbe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Channel {
    Preview,
    Commit,
}

impl RequestKind {
    fn channel(self) -> Channel {
        match self {
            RequestKind::Probe | RequestKind::PromotionProbe => Channel::Preview,
            RequestKind::Drop | RequestKind::Promotion => Channel::Commit,
        }
    }
}

#[derive(Debug)]
struct Outstanding {
    seq: u64,
    kind: RequestKind,
    request: MoveRequest,
    sent_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct DragGesture {
    origin: Cell,
    piece: Piece,
    hovering: Option<Cell>,
}

/// How a drop gesture ended on the client side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Sent; the board changes when the verdict comes back.
    Sent { seq: u64 },
    /// Dropped back on the starting cell.
    Cancelled,
}

/// What a verdict did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictOutcome {
    Applied(MoveEffects),
    Rejected,
    Previewed,
    Promoted,
    /// Answer to a request that has since been superseded.
    Stale,
    /// Accepted, but the board did not match it; nothing was changed.
    Inconsistent,
    /// No outstanding request for it.
    Unmatched,
}

pub struct MoveChoreographer<T, S> {
    board: Board,
    rules: RulesEngine,
    session: GameSession,
    transport: T,
    store: S,
    phase: Phase,
    gesture: Option<DragGesture>,
    outstanding: VecDeque<Outstanding>,
    latest: HashMap<Channel, u64>,
    next_seq: u64,
}

impl<T: MoveTransport, S: SnapshotStore> MoveChoreographer<T, S> {
    pub fn new(board: Board, transport: T, store: S) -> Self {
        Self {
            board,
            rules: RulesEngine::new(),
            session: GameSession::default(),
            transport,
            store,
            phase: Phase::Idle,
            gesture: None,
            outstanding: VecDeque::new(),
            latest: HashMap::new(),
            next_seq: 1,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn apply(&mut self, gesture: Gesture) -> Result<(), ClientError> {
        match gesture {
            Gesture::DragStarted(cell) => self.drag_started(cell),
            Gesture::DragEntered(cell) => self.drag_entered(cell).map(|_| ()),
            Gesture::DragLeft(cell) => {
                self.drag_left(cell);
                Ok(())
            }
            Gesture::Drop(cell) => self.drop(cell).map(|_| ()),
            Gesture::CandidateClicked(cell) => self.candidate_clicked(cell).map(|_| ()),
            Gesture::CandidateHovered(cell) => self.candidate_hovered(cell).map(|_| ()),
            Gesture::SaveRestore => self.save_restore(),
        }
    }

    fn ensure_interactive(&self) -> Result<(), ClientError> {
        if self.board.interaction_enabled() {
            Ok(())
        } else {
            Err(ClientError::Gesture("the game is over".into()))
        }
    }

    /// Whether the latest verdict judged exactly `choice`: a hover on that
    /// candidate, or the drop itself when the choice is the queen the
    /// validator assumes for an undecided promotion.
    fn session_judged(&self, choice: &MoveRequest) -> bool {
        let piece = choice.piece_moved;
        let same_move = self.session.starting_cell == Some(choice.old_cell)
            && self.session.processed_cell == Some(choice.new_cell);
        let same_piece = match self.session.last_moved_piece {
            Some(judged) if judged == piece => true,
            Some(judged) => judged.is(piece.color, Kind::Pawn) && piece.kind == Kind::Queen,
            None => false,
        };
        self.session.move_valid && same_move && same_piece
    }

    pub fn drag_started(&mut self, cell: Cell) -> Result<(), ClientError> {
        self.ensure_interactive()?;
        if self.board.is_hidden(cell) || self.rules.is_promotion_candidate(cell) {
            return Err(ClientError::Gesture(format!("{cell} is offering a promotion")));
        }
        let piece = self
            .board
            .piece_at(cell)
            .ok_or_else(|| ClientError::Gesture(format!("no piece on {cell}")))?;

        self.board.clear_marker(&CellMarker::DropZone);
        self.gesture = Some(DragGesture {
            origin: cell,
            piece,
            hovering: None,
        });
        debug!(cell = %cell, piece = %piece, "Drag started");
        Ok(())
    }

    /// Probe `cell` as a drop target. Returns the probe's sequence number, or
    /// `None` when hovering the starting cell.
    pub fn drag_entered(&mut self, cell: Cell) -> Result<Option<u64>, ClientError> {
        let gesture = self
            .gesture
            .as_mut()
            .ok_or_else(|| ClientError::Gesture("no drag in progress".into()))?;
        gesture.hovering = Some(cell);
        if cell == gesture.origin {
            return Ok(None);
        }
        let probe = MoveRequest::probe(gesture.piece, gesture.origin, cell);
        self.dispatch(RequestKind::Probe, probe).map(Some)
    }

    pub fn drag_left(&mut self, cell: Cell) {
        self.board.unmark(cell, &CellMarker::DropZone);
        if let Some(gesture) = self.gesture.as_mut() {
            if gesture.hovering == Some(cell) {
                gesture.hovering = None;
            }
        }
    }

    /// Finish the drag on `cell`. Nothing on the board moves until the
    /// verdict arrives; a failed send puts the board back as it was before
    /// the drag.
    pub fn drop(&mut self, cell: Cell) -> Result<DropOutcome, ClientError> {
        let gesture = self
            .gesture
            .take()
            .ok_or_else(|| ClientError::Gesture("no drag in progress".into()))?;
        self.board.clear_marker(&CellMarker::DropZone);

        if cell == gesture.origin {
            debug!(cell = %cell, "Drop on starting cell, cancelled");
            return Ok(DropOutcome::Cancelled);
        }

        let mut request = MoveRequest::probe(gesture.piece, gesture.origin, cell);
        request.event_type = Some(EventType::Dragend);
        request.castle = Some(self.rules.can_castle(&self.board, gesture.origin, cell));

        match self.dispatch(RequestKind::Drop, request) {
            Ok(seq) => Ok(DropOutcome::Sent { seq }),
            Err(e) => {
                error!(error = %e, from = %gesture.origin, to = %cell, "Move not sent");
                Err(e)
            }
        }
    }

    /// Pick the promotion offered on `cell` and report it to the validator.
    pub fn candidate_clicked(&mut self, cell: Cell) -> Result<u64, ClientError> {
        self.ensure_interactive()?;
        let choice = self
            .rules
            .hover_promotion(cell)
            .ok_or_else(|| ClientError::Gesture(format!("{cell} is not a promotion choice")))?;
        let (check, mate) = if self.session_judged(&choice) {
            (self.session.check, self.session.checkmate)
        } else {
            (false, false)
        };

        let board_before = self.board.clone();
        let rules_before = self.rules.clone();

        let outcome =
            self.rules
                .complete_promotion(&mut self.board, cell, check, mate, self.session.winner)?;

        match self.dispatch(RequestKind::Promotion, outcome.request) {
            Ok(seq) => Ok(seq),
            Err(e) => {
                error!(error = %e, cell = %cell, "Promotion not sent");
                self.board = board_before;
                self.rules = rules_before;
                Err(e)
            }
        }
    }

    /// Ask the validator what the promotion offered on `cell` would do.
    pub fn candidate_hovered(&mut self, cell: Cell) -> Result<u64, ClientError> {
        self.ensure_interactive()?;
        let probe = self
            .rules
            .hover_promotion(cell)
            .ok_or_else(|| ClientError::Gesture(format!("{cell} is not a promotion choice")))?;
        self.dispatch(RequestKind::PromotionProbe, probe)
    }

    /// Keyboard save/restore: keep the current board in the store and redraw
    /// it from there. Open promotions are saved with their pawn and offered
    /// again once the board is back.
    pub fn save_restore(&mut self) -> Result<(), ClientError> {
        let suspended = self.rules.abandon_promotions(&mut self.board);
        let current = self.board.snapshot();
        let restored = match self.store.sync(&current) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Board snapshot not stored");
                current
            }
        };
        let applied = self.board.apply_snapshot(&restored);
        let resumed = self.rules.resume_promotions(&mut self.board, suspended);
        applied?;
        info!(promotions = resumed.len(), "Board restored from snapshot");
        Ok(())
    }

    fn dispatch(&mut self, kind: RequestKind, mut request: MoveRequest) -> Result<u64, ClientError> {
        let seq = self.next_seq;
        self.next_seq += 1;
        request.seq = Some(seq);

        self.transport.send(&request)?;
        debug!(seq, ?kind, from = %request.old_cell, to = %request.new_cell, "Request sent");

        self.latest.insert(kind.channel(), seq);
        if kind.channel() == Channel::Commit {
            self.phase = Phase::AwaitingVerdict { seq };
        }
        self.outstanding.push_back(Outstanding {
            seq,
            kind,
            request,
            sent_at: Instant::now(),
        });
        Ok(seq)
    }

    fn take_outstanding(&mut self, seq: Option<u64>) -> Option<Outstanding> {
        match seq {
            Some(seq) => {
                let pos = self.outstanding.iter().position(|o| o.seq == seq)?;
                self.outstanding.remove(pos)
            }
            None => self.outstanding.pop_front(),
        }
    }

    pub fn handle_verdict(&mut self, verdict: MoveVerdict) -> VerdictOutcome {
        let Some(entry) = self.take_outstanding(verdict.seq) else {
            warn!(seq = ?verdict.seq, cell = %verdict.processed_cell, "Verdict with no outstanding request");
            return VerdictOutcome::Unmatched;
        };
        debug!(
            seq = entry.seq,
            latency_ms = entry.sent_at.elapsed().as_secs_f64() * 1000.0,
            "Verdict round trip"
        );

        let superseded = self
            .latest
            .get(&entry.kind.channel())
            .is_some_and(|&latest| latest > entry.seq);
        if superseded {
            debug!(seq = entry.seq, kind = ?entry.kind, "Discarding stale verdict");
            return VerdictOutcome::Stale;
        }

        self.session = GameSession::from_verdict(&verdict, &entry.request);

        let outcome = match entry.kind {
            RequestKind::Probe => self.preview(&entry.request, &verdict),
            RequestKind::PromotionProbe => VerdictOutcome::Previewed,
            RequestKind::Drop => self.resolve_drop(&entry.request, &verdict),
            RequestKind::Promotion => {
                self.rules
                    .apply_promotion_verdict(&mut self.board, entry.request.piece_moved, &verdict);
                if verdict.move_valid {
                    VerdictOutcome::Promoted
                } else {
                    warn!(cell = %verdict.processed_cell, "Validator rejected the promotion");
                    VerdictOutcome::Rejected
                }
            }
        };

        if self.phase == (Phase::AwaitingVerdict { seq: entry.seq }) {
            self.phase = Phase::Idle;
        }
        outcome
    }

    fn preview(&mut self, request: &MoveRequest, verdict: &MoveVerdict) -> VerdictOutcome {
        let still_hovering = self
            .gesture
            .is_some_and(|g| g.origin == request.old_cell && g.hovering == Some(request.new_cell));
        if verdict.move_valid && still_hovering && verdict.processed_cell == request.new_cell {
            self.board.mark(request.new_cell, CellMarker::DropZone);
        }
        VerdictOutcome::Previewed
    }

    fn resolve_drop(&mut self, request: &MoveRequest, verdict: &MoveVerdict) -> VerdictOutcome {
        if !verdict.move_valid {
            debug!(from = %request.old_cell, to = %request.new_cell, "Move rejected");
            return VerdictOutcome::Rejected;
        }

        let before = self.board.clone();
        match self.rules.commit_move(&mut self.board, request, verdict) {
            Ok(effects) => {
                info!(
                    piece = %request.piece_moved,
                    from = %request.old_cell,
                    to = %verdict.processed_cell,
                    "Move applied"
                );
                VerdictOutcome::Applied(effects)
            }
            Err(e) => {
                warn!(error = %e, "Accepted move does not fit the board, skipped");
                self.board = before;
                VerdictOutcome::Inconsistent
            }
        }
    }
}
