//! The rendered board: one piece glyph (possibly hidden) and a set of visual
//! markers per cell, plus the board-wide interaction flag and result banner.
//!
//! Every component that touches the board goes through these methods; nothing
//! else holds a cell → piece mapping.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::BoardError;
use crate::glyph::{self, GlyphResolver};
use crate::piece::{Color, Kind, Piece};

/// Stored value for an empty cell in a [`BoardSnapshot`].
pub const EMPTY_CELL_VALUE: &str = "empty";

/// Visual class attached to a cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellMarker {
    /// King standing in check.
    Check,
    /// Valid drop target for the piece being dragged.
    DropZone,
    /// Promotion candidate, labelled like "white-queen".
    Promotion(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CellState {
    piece: Option<Piece>,
    hidden: bool,
    markers: BTreeSet<CellMarker>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<CellState>,
    interaction_enabled: bool,
    banner: Option<String>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: vec![CellState::default(); 64],
            interaction_enabled: true,
            banner: None,
        }
    }

    /// Standard initial position, white on ranks 1-2.
    pub fn standard() -> Self {
        let back = [
            Kind::Rook,
            Kind::Knight,
            Kind::Bishop,
            Kind::Queen,
            Kind::King,
            Kind::Bishop,
            Kind::Knight,
            Kind::Rook,
        ];
        let mut board = Self::empty();
        for (file, kind) in back.iter().enumerate() {
            let file = file as i8;
            for (rank, color, kind) in [
                (1, Color::White, *kind),
                (2, Color::White, Kind::Pawn),
                (7, Color::Black, Kind::Pawn),
                (8, Color::Black, *kind),
            ] {
                if let Some(cell) = Cell::from_coords(file, rank) {
                    board.place(cell, Piece::new(color, kind));
                }
            }
        }
        board
    }

    /// Build a board from (cell code, piece code) pairs.
    pub fn from_placements(placements: &[(&str, &str)]) -> Result<Self, BoardError> {
        let mut board = Self::empty();
        for (cell, piece) in placements {
            board.place(cell.parse()?, piece.parse()?);
        }
        Ok(board)
    }

    fn state(&self, cell: Cell) -> &CellState {
        &self.cells[cell.index()]
    }

    fn state_mut(&mut self, cell: Cell) -> &mut CellState {
        &mut self.cells[cell.index()]
    }

    /// Piece in the cell, hidden or not.
    pub fn piece_at(&self, cell: Cell) -> Option<Piece> {
        self.state(cell).piece
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.piece_at(cell).is_some()
    }

    /// Put a piece in a cell, returning whatever was there.
    pub fn place(&mut self, cell: Cell, piece: Piece) -> Option<Piece> {
        let state = self.state_mut(cell);
        state.hidden = false;
        state.piece.replace(piece)
    }

    pub fn remove(&mut self, cell: Cell) -> Option<Piece> {
        let state = self.state_mut(cell);
        state.hidden = false;
        state.piece.take()
    }

    /// Move the piece in `from` onto `to`, returning the piece it displaced.
    pub fn relocate(&mut self, from: Cell, to: Cell) -> Result<Option<Piece>, BoardError> {
        let piece = self
            .remove(from)
            .ok_or_else(|| BoardError::StateInconsistency(format!("no piece to move on {from}")))?;
        Ok(self.place(to, piece))
    }

    /// Hide the glyph in a cell without removing the piece. Returns false if
    /// the cell is empty.
    pub fn hide(&mut self, cell: Cell) -> bool {
        let state = self.state_mut(cell);
        if state.piece.is_some() {
            state.hidden = true;
            true
        } else {
            false
        }
    }

    pub fn reveal(&mut self, cell: Cell) {
        self.state_mut(cell).hidden = false;
    }

    pub fn is_hidden(&self, cell: Cell) -> bool {
        self.state(cell).hidden
    }

    pub fn mark(&mut self, cell: Cell, marker: CellMarker) {
        self.state_mut(cell).markers.insert(marker);
    }

    pub fn unmark(&mut self, cell: Cell, marker: &CellMarker) {
        self.state_mut(cell).markers.remove(marker);
    }

    pub fn has_marker(&self, cell: Cell, marker: &CellMarker) -> bool {
        self.state(cell).markers.contains(marker)
    }

    pub fn markers(&self, cell: Cell) -> impl Iterator<Item = &CellMarker> {
        self.state(cell).markers.iter()
    }

    /// Remove a marker from every cell.
    pub fn clear_marker(&mut self, marker: &CellMarker) {
        for state in &mut self.cells {
            state.markers.remove(marker);
        }
    }

    pub fn cells_marked(&self, marker: &CellMarker) -> Vec<Cell> {
        Cell::all().filter(|c| self.has_marker(*c, marker)).collect()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Cell, Piece)> + '_ {
        Cell::all().filter_map(|c| self.piece_at(c).map(|p| (c, p)))
    }

    /// Locate the king of `color`. Missing or duplicated kings are reported.
    pub fn find_king(&self, color: Color) -> Result<Cell, BoardError> {
        let mut kings = self
            .pieces()
            .filter(|(_, p)| p.is(color, Kind::King))
            .map(|(c, _)| c);
        match (kings.next(), kings.next()) {
            (Some(cell), None) => Ok(cell),
            (None, _) => Err(BoardError::StateInconsistency(format!(
                "no {} king on the board",
                color.label()
            ))),
            (Some(a), Some(b)) => Err(BoardError::StateInconsistency(format!(
                "two {} kings on the board ({a}, {b})",
                color.label()
            ))),
        }
    }

    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    pub fn disable_interaction(&mut self) {
        self.interaction_enabled = false;
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn set_banner(&mut self, text: String) {
        self.banner = Some(text);
    }

    /// Lift a result posted ahead of its confirming verdict.
    pub fn clear_result(&mut self) {
        self.interaction_enabled = true;
        self.banner = None;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot(
            Cell::all()
                .map(|c| {
                    let value = self
                        .piece_at(c)
                        .map(|p| p.code())
                        .unwrap_or_else(|| EMPTY_CELL_VALUE.to_string());
                    (c.to_string(), value)
                })
                .collect(),
        )
    }

    /// Replace every piece with the snapshot's contents. Hidden glyphs come
    /// back visible; markers are left alone. Cells missing from the snapshot
    /// end up empty.
    pub fn apply_snapshot(&mut self, snapshot: &BoardSnapshot) -> Result<(), BoardError> {
        let mut pieces = Vec::new();
        for (cell, value) in &snapshot.0 {
            let cell: Cell = cell.parse()?;
            if value != EMPTY_CELL_VALUE {
                pieces.push((cell, value.parse::<Piece>()?));
            }
        }
        for state in &mut self.cells {
            state.piece = None;
            state.hidden = false;
        }
        for (cell, piece) in pieces {
            self.place(cell, piece);
        }
        Ok(())
    }

    /// Text rendering, rank 8 at the top. Hidden glyphs and unresolved codes
    /// render as blanks.
    pub fn render(&self, resolver: &dyn GlyphResolver) -> String {
        let mut out = String::new();
        for rank in (1..=8i8).rev() {
            out.push_str(&format!("{rank} "));
            for file in 0..8i8 {
                let Some(cell) = Cell::from_coords(file, rank) else {
                    continue;
                };
                let glyph = match self.piece_at(cell) {
                    Some(piece) if !self.is_hidden(cell) => {
                        glyph::resolve(resolver, piece).unwrap_or(" ")
                    }
                    _ => ".",
                };
                let tag = if self.has_marker(cell, &CellMarker::Check) {
                    '!'
                } else if self
                    .markers(cell)
                    .any(|m| matches!(m, CellMarker::Promotion(_)))
                {
                    '?'
                } else if self.has_marker(cell, &CellMarker::DropZone) {
                    '*'
                } else {
                    ' '
                };
                out.push_str(glyph);
                out.push(tag);
            }
            out.push('\n');
        }
        out.push_str("  a b c d e f g h\n");
        if let Some(banner) = &self.banner {
            out.push_str(banner);
            out.push('\n');
        }
        out
    }
}

/// Cell code → piece code (or `"empty"`), the saved-board layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot(pub BTreeMap<String, String>);
