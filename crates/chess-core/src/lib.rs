//! Board model and wire types shared by the relay client and the validator.
//!
//! Cells and pieces use the two-character text codes of the chess session
//! protocol ("e4", "WK"), so everything here serializes straight onto the wire.

pub mod board;
pub mod cell;
pub mod error;
pub mod glyph;
pub mod piece;
pub mod wire;

pub use board::{Board, BoardSnapshot, CellMarker};
pub use cell::Cell;
pub use error::BoardError;
pub use glyph::{GlyphResolver, UnicodeGlyphs};
pub use piece::{Color, Kind, Piece};
pub use wire::{EventType, MoveRequest, MoveVerdict};
