//! One player's Qwixx score sheet.

use super::action::RowError;
use super::row::{Crossing, Row};
use super::types::{Move, RowColor};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{info, instrument};

/// Four rows, Red, Yellow, Green, Blue from top to bottom.
///
/// Each board owns its rows outright. Cloning a board deep-copies every
/// row, which is how players receive a view they cannot use to change the
/// authoritative sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: [Row; 4],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            rows: RowColor::ALL.map(Row::for_color),
        }
    }

    /// Replaces the row of `color`, for setting up positions.
    ///
    /// The row must be numbered the way `color` is.
    pub fn with_row(mut self, color: RowColor, row: Row) -> Self {
        debug_assert_eq!(
            row.orientation(),
            color.orientation(),
            "{color} row has the wrong orientation"
        );
        self.rows[color.board_index()] = row;
        self
    }

    /// The row of the given color.
    pub fn row(&self, color: RowColor) -> &Row {
        &self.rows[color.board_index()]
    }

    fn row_mut(&mut self, color: RowColor) -> &mut Row {
        &mut self.rows[color.board_index()]
    }

    /// Checks a move against its row without changing anything.
    pub fn check_move(&self, mv: Move) -> Result<(), RowError> {
        self.row(mv.row).check_move(mv.cell_number)
    }

    /// Boolean form of [`Board::check_move`].
    pub fn is_move_valid(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// Applies a move to its row. On error the board is unchanged.
    #[instrument(skip(self), fields(mv = %mv))]
    pub fn make_move(&mut self, mv: Move) -> Result<Crossing, RowError> {
        let crossing = self.row_mut(mv.row).make_move(mv.cell_number)?;
        if crossing == Crossing::Lock {
            info!(row = %mv.row, "Row locked by crossing its last cell");
        }
        Ok(crossing)
    }

    /// Whether the cell `cell_number` in row `color` is crossed.
    pub fn is_cell_marked(&self, color: RowColor, cell_number: u8) -> bool {
        self.row(color).is_cell_marked(cell_number)
    }

    /// Whether row `color` can no longer be played.
    pub fn is_row_locked(&self, color: RowColor) -> bool {
        self.row(color).is_locked()
    }

    /// Locks row `color` because it was locked somewhere in the game.
    pub fn lock_row(&mut self, color: RowColor) {
        self.row_mut(color).lock();
    }

    /// Colors of every locked row, in board order.
    pub fn locked_rows(&self) -> impl Iterator<Item = RowColor> + '_ {
        RowColor::iter().filter(|&color| self.is_row_locked(color))
    }

    /// Sum of the four row scores.
    pub fn calculate_score(&self) -> u32 {
        self.rows.iter().map(Row::calculate_score).sum()
    }

    /// Four labelled lines, one per row.
    pub fn print(&self) -> String {
        RowColor::ALL
            .iter()
            .map(|&color| format!("{}: {}", color, self.row(color).print()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.print())
    }
}
