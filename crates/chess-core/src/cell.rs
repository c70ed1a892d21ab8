//! Cell coordinates in letter+digit form ("e4").

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

pub const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// One square of the board. `file` is 0..=7 (a..h), `rank` is 1..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cell {
    file: u8,
    rank: u8,
}

impl Cell {
    pub fn new(file: char, rank: u8) -> Result<Self, BoardError> {
        let idx = FILES
            .iter()
            .position(|&f| f == file)
            .ok_or_else(|| BoardError::InvalidCell(format!("{file}{rank}")))?;
        if !(1..=8).contains(&rank) {
            return Err(BoardError::InvalidCell(format!("{file}{rank}")));
        }
        Ok(Self {
            file: idx as u8,
            rank,
        })
    }

    /// Build from a zero-based file index and a one-based rank.
    /// Returns `None` off the board.
    pub fn from_coords(file: i8, rank: i8) -> Option<Self> {
        if (0..8).contains(&file) && (1..=8).contains(&rank) {
            Some(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    pub fn file(self) -> char {
        FILES[self.file as usize]
    }

    pub fn file_index(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Same file, different rank.
    pub fn with_rank(self, rank: u8) -> Option<Self> {
        Self::from_coords(self.file as i8, rank as i8)
    }

    /// Step by (files, ranks). Never wraps across the board edge.
    pub fn offset(self, files: i8, ranks: i8) -> Option<Self> {
        Self::from_coords(self.file as i8 + files, self.rank as i8 + ranks)
    }

    /// Dense index 0..64, rank-major from a1.
    pub fn index(self) -> usize {
        (self.rank as usize - 1) * 8 + self.file as usize
    }

    pub fn all() -> impl Iterator<Item = Cell> {
        (1..=8u8).flat_map(|rank| (0..8u8).map(move |file| Cell { file, rank }))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank)
    }
}

impl FromStr for Cell {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => {
                let rank = rank
                    .to_digit(10)
                    .ok_or_else(|| BoardError::InvalidCell(s.to_string()))?;
                Cell::new(file, rank as u8).map_err(|_| BoardError::InvalidCell(s.to_string()))
            }
            _ => Err(BoardError::InvalidCell(s.to_string())),
        }
    }
}

impl TryFrom<String> for Cell {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.to_string()
    }
}
