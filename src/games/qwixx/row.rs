//! A single colored row of the score sheet.

use super::action::RowError;
use super::invariants::assert_invariants;
use super::types::{
    CELLS_PER_ROW, CROSSINGS_BEFORE_LOCK, Orientation, RIGHTMOST_INDEX, RowColor, SCORE_TABLE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// What a successful crossing did to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crossing {
    /// An ordinary cell was crossed.
    Cell,
    /// The rightmost cell was crossed and the row is now locked.
    Lock,
}

/// Eleven numbered cells crossed strictly left to right, plus the lock.
///
/// Once a cell is crossed nothing to its left may be crossed afterwards.
/// The rightmost cell needs five other crossings first, and crossing it
/// locks the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    orientation: Orientation,
    cells: [bool; CELLS_PER_ROW],
    locked: bool,
}

impl Row {
    /// Creates an empty row.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            cells: [false; CELLS_PER_ROW],
            locked: false,
        }
    }

    /// Creates an empty row numbered the way `color` is.
    pub fn for_color(color: RowColor) -> Self {
        Self::new(color.orientation())
    }

    /// Creates a row in an arbitrary state, e.g. a mid-game position.
    ///
    /// A crossed rightmost cell always yields a locked row.
    pub fn from_cells(orientation: Orientation, cells: [bool; CELLS_PER_ROW], locked: bool) -> Self {
        Self {
            orientation,
            cells,
            locked: locked || cells[RIGHTMOST_INDEX],
        }
    }

    /// Numbering direction.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Crossed state of each cell, leftmost first.
    pub fn cells(&self) -> &[bool; CELLS_PER_ROW] {
        &self.cells
    }

    /// True once the row can no longer be played, on this board or globally.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Number of crossed numbered cells (0-11), lock not included.
    pub fn crossed_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Whether the cell with this number is crossed. Out-of-range numbers are never crossed.
    pub fn is_cell_marked(&self, cell_number: u8) -> bool {
        self.orientation
            .index_of(cell_number)
            .map(|i| self.cells[i])
            .unwrap_or(false)
    }

    /// Checks whether `cell_number` could be crossed now, without changing anything.
    ///
    /// Checks run in a fixed order: lock, number range, already crossed,
    /// crossings to the right, lock quota.
    #[instrument(skip(self), fields(orientation = ?self.orientation, locked = self.locked))]
    pub fn check_move(&self, cell_number: u8) -> Result<(), RowError> {
        if self.locked {
            return Err(RowError::RowIsLocked);
        }

        let index = self.orientation.index_of(cell_number)?;

        if self.cells[index] {
            return Err(RowError::CellAlreadyMarked(cell_number));
        }

        if self.cells[index + 1..].iter().any(|&c| c) {
            return Err(RowError::CellOutOfOrder(cell_number));
        }

        if index == RIGHTMOST_INDEX && self.crossed_count() < CROSSINGS_BEFORE_LOCK {
            return Err(RowError::LockRequirementUnmet);
        }

        Ok(())
    }

    /// Boolean form of [`Row::check_move`].
    pub fn is_move_valid(&self, cell_number: u8) -> bool {
        self.check_move(cell_number).is_ok()
    }

    /// Crosses off `cell_number`, locking the row if it is the rightmost cell.
    ///
    /// On error the row is unchanged. A row that is already locked reports
    /// [`RowError::AlreadyLocked`] rather than the validity check's
    /// [`RowError::RowIsLocked`].
    #[instrument(skip(self), fields(orientation = ?self.orientation))]
    pub fn make_move(&mut self, cell_number: u8) -> Result<Crossing, RowError> {
        if self.locked {
            return Err(RowError::AlreadyLocked);
        }
        self.check_move(cell_number)?;
        let index = self.orientation.index_of(cell_number)?;

        #[cfg(debug_assertions)]
        let before = self.cells;

        self.cells[index] = true;
        let crossing = if index == RIGHTMOST_INDEX {
            self.locked = true;
            Crossing::Lock
        } else {
            Crossing::Cell
        };

        #[cfg(debug_assertions)]
        debug_assert_eq!(
            before.iter().zip(self.cells.iter()).filter(|(b, a)| b != a).count(),
            1,
            "a crossing changes exactly one cell"
        );
        assert_invariants(self);

        debug!(cell_number, ?crossing, "Cell crossed off");
        Ok(crossing)
    }

    /// Locks the row without crossing anything (another board locked this color).
    ///
    /// No lock bonus is granted; that only follows from crossing the rightmost cell.
    #[instrument(skip(self))]
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Score for this row.
    ///
    /// A crossed rightmost cell also counts the lock cell as crossed.
    pub fn calculate_score(&self) -> u32 {
        let mut crossed = self.crossed_count();
        if self.cells[RIGHTMOST_INDEX] {
            crossed += 1;
        }
        SCORE_TABLE[crossed]
    }

    /// Renders the row as `[2| ] [3|X] ... [12| ] [L| ]`.
    pub fn print(&self) -> String {
        let mut text = String::new();
        for (index, &crossed) in self.cells.iter().enumerate() {
            // index is always in range for the fixed-size array
            let number = self.orientation.cell_number_at(index).unwrap_or_default();
            text.push_str(&format!("[{}|{}]", number, mark(crossed)));
            text.push(' ');
        }
        text.push_str(&format!("[L|{}]", mark(self.cells[RIGHTMOST_INDEX])));
        text
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.print())
    }
}

fn mark(crossed: bool) -> char {
    if crossed { 'X' } else { ' ' }
}
