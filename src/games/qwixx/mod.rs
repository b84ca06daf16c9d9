//! Qwixx: four colored rows crossed off left to right with sums of six dice.

mod action;
mod board;
mod dice;
pub mod invariants;
mod phases;
mod row;
pub mod rules;
mod types;

pub use action::{ActivePlayerTurn, InactivePlayerTurn, RowError, TurnError};
pub use board::Board;
pub use dice::{DiceRoll, DiceSums, possible_color_moves, possible_white_moves, roll_dice};
pub use phases::{AppliedTurn, TurnOutcome, Validated};
pub use row::{Crossing, Row};
pub use types::{
    CELLS_PER_ROW, CROSSINGS_BEFORE_LOCK, MAX_CELL_NUMBER, MIN_CELL_NUMBER, Move, Orientation,
    RIGHTMOST_INDEX, RowColor, SCORE_TABLE,
};
