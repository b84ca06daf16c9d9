//! Core domain types for Qwixx.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

use super::action::RowError;

/// Number of numbered cells in a row (the lock cell is implicit).
pub const CELLS_PER_ROW: usize = 11;

/// Index of the rightmost numbered cell.
pub const RIGHTMOST_INDEX: usize = CELLS_PER_ROW - 1;

/// Smallest number printed on a cell.
pub const MIN_CELL_NUMBER: u8 = 2;

/// Largest number printed on a cell.
pub const MAX_CELL_NUMBER: u8 = 12;

/// Crossings required elsewhere in a row before its rightmost cell may be crossed.
pub const CROSSINGS_BEFORE_LOCK: usize = 5;

/// Row score indexed by the number of crossed cells.
///
/// Twelve entries past zero because crossing the rightmost cell also
/// crosses the lock.
pub const SCORE_TABLE: [u32; 13] = [0, 1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 66, 78];

/// Color of a scoring row (and of its matching die).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum RowColor {
    /// Top row, numbered 2 through 12.
    Red,
    /// Second row, numbered 2 through 12.
    Yellow,
    /// Third row, numbered 12 down to 2.
    Green,
    /// Bottom row, numbered 12 down to 2.
    Blue,
}

impl RowColor {
    /// All colors in board order (top to bottom).
    pub const ALL: [RowColor; 4] = [
        RowColor::Red,
        RowColor::Yellow,
        RowColor::Green,
        RowColor::Blue,
    ];

    /// Direction the numbers run for this row color.
    pub fn orientation(self) -> Orientation {
        match self {
            RowColor::Red | RowColor::Yellow => Orientation::Ascending,
            RowColor::Green | RowColor::Blue => Orientation::Descending,
        }
    }

    /// Position of this color's row on the board.
    pub fn board_index(self) -> usize {
        match self {
            RowColor::Red => 0,
            RowColor::Yellow => 1,
            RowColor::Green => 2,
            RowColor::Blue => 3,
        }
    }
}

impl FromStr for RowColor {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" | "r" => Ok(RowColor::Red),
            "yellow" | "y" => Ok(RowColor::Yellow),
            "green" | "g" => Ok(RowColor::Green),
            "blue" | "b" => Ok(RowColor::Blue),
            other => Err(RowError::InvalidRowColor(other.to_string())),
        }
    }
}

/// Left-to-right numbering direction of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Cells read 2, 3, ..., 12.
    Ascending,
    /// Cells read 12, 11, ..., 2.
    Descending,
}

impl Orientation {
    /// Maps a cell number (2-12) to its position in the row.
    #[instrument]
    pub fn index_of(self, cell_number: u8) -> Result<usize, RowError> {
        if !(MIN_CELL_NUMBER..=MAX_CELL_NUMBER).contains(&cell_number) {
            return Err(RowError::InvalidCellNumber(cell_number.into()));
        }
        Ok(match self {
            Orientation::Ascending => usize::from(cell_number - MIN_CELL_NUMBER),
            Orientation::Descending => usize::from(MAX_CELL_NUMBER - cell_number),
        })
    }

    /// Maps a position in the row (0-10) to the number printed on that cell.
    #[instrument]
    pub fn cell_number_at(self, index: usize) -> Result<u8, RowError> {
        if index > RIGHTMOST_INDEX {
            return Err(RowError::InvalidIndex(index));
        }
        // index <= 10, so the narrowing is lossless
        let offset = index as u8;
        Ok(match self {
            Orientation::Ascending => MIN_CELL_NUMBER + offset,
            Orientation::Descending => MAX_CELL_NUMBER - offset,
        })
    }
}

/// Crossing off the cell with a given number on the row of a given color.
///
/// Moves carry no lifecycle. They are proposed, validated, and applied
/// within a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct Move {
    /// Row the cell belongs to.
    pub row: RowColor,
    /// Number printed on the cell, 2-12.
    pub cell_number: u8,
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {})", self.row, self.cell_number)
    }
}

impl FromStr for Move {
    type Err = RowError;

    /// Parses `"<color> <number>"`, e.g. `red 5` or `B 11`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let row = parts
            .next()
            .ok_or_else(|| RowError::InvalidRowColor(String::new()))?
            .parse::<RowColor>()?;
        let typed = parts
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or(RowError::InvalidCellNumber(0))?;
        let cell_number = u8::try_from(typed).map_err(|_| RowError::InvalidCellNumber(typed))?;
        Ok(Move::new(row, cell_number))
    }
}
