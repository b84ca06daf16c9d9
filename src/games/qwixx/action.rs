//! Turn proposals and the errors raised while checking them.
//!
//! Turns are what a player hands back when prompted. They are plain data
//! and can be validated against a board and a roll before anything is
//! applied.

use super::Move;
use serde::{Deserialize, Serialize};

/// Turn of the player who rolled the dice.
///
/// Both slots empty means the player takes a penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePlayerTurn {
    /// Move using the sum of both white dice.
    pub white_dice_move: Option<Move>,
    /// Move using one white die plus one colored die.
    pub color_dice_move: Option<Move>,
}

impl ActivePlayerTurn {
    /// An explicit penalty.
    pub fn penalty() -> Self {
        Self::default()
    }

    /// Creates a turn from both optional moves.
    pub fn new(white_dice_move: Option<Move>, color_dice_move: Option<Move>) -> Self {
        Self {
            white_dice_move,
            color_dice_move,
        }
    }

    /// True when neither move is present.
    pub fn is_penalty(&self) -> bool {
        self.white_dice_move.is_none() && self.color_dice_move.is_none()
    }

    /// Present moves in application order (white first).
    pub fn moves(&self) -> impl Iterator<Item = Move> {
        self.white_dice_move.into_iter().chain(self.color_dice_move)
    }
}

impl std::fmt::Display for ActivePlayerTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "white: {}, color: {}",
            display_slot(self.white_dice_move),
            display_slot(self.color_dice_move)
        )
    }
}

/// Turn of a player who did not roll: the white dice sum only, and optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InactivePlayerTurn {
    /// Move using the sum of both white dice.
    pub white_dice_move: Option<Move>,
}

impl InactivePlayerTurn {
    /// Declining to move. Never a penalty for inactive players.
    pub fn pass() -> Self {
        Self::default()
    }

    /// Creates a turn with an optional white dice move.
    pub fn new(white_dice_move: Option<Move>) -> Self {
        Self { white_dice_move }
    }
}

impl std::fmt::Display for InactivePlayerTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "white: {}", display_slot(self.white_dice_move))
    }
}

fn display_slot(slot: Option<Move>) -> String {
    slot.map_or_else(|| "none".to_string(), |m| m.to_string())
}

/// Reason a single row rejected a crossing.
///
/// All of these are recoverable. The row is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RowError {
    /// `make_move` on a row that is already locked.
    #[display("cannot make move, row is already locked")]
    AlreadyLocked,

    /// Validity check on a locked row.
    #[display("row is locked")]
    RowIsLocked,

    /// Target cell is already crossed.
    #[display("cell {} is already crossed off", _0)]
    CellAlreadyMarked(u8),

    /// A cell to the right of the target is already crossed.
    #[display("cell {} is to the left of already crossed off cells", _0)]
    CellOutOfOrder(u8),

    /// Rightmost cell targeted before enough other cells are crossed.
    #[display(
        "cannot cross off rightmost cell of row unless 5 cells have been crossed off in that row"
    )]
    LockRequirementUnmet,

    /// Cell number outside 2-12, as given (typed text may exceed `u8`).
    #[display("invalid cell number: {}. must be between 2 and 12", _0)]
    InvalidCellNumber(u32),

    /// Row position outside 0-10.
    #[display("invalid index: {}. must be between 0 and 10", _0)]
    InvalidIndex(usize),

    /// Text that names no row color.
    #[display("invalid move row color: {:?}", _0)]
    InvalidRowColor(String),
}

impl RowError {
    /// True for either flavor of locked-row rejection.
    pub fn is_locked(&self) -> bool {
        matches!(self, RowError::AlreadyLocked | RowError::RowIsLocked)
    }
}

impl std::error::Error for RowError {}

/// Reason a proposed turn was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TurnError {
    /// White dice move whose cell number is not the white sum.
    #[display("{} does not use the sum of the white dice", _0)]
    WhiteSumMismatch(Move),

    /// Color dice move that is not one of the rolled white+color sums for its row.
    #[display("{} does not use a white die plus the matching color die", _0)]
    ColorSumMismatch(Move),

    /// Roll with a die outside 1-6.
    #[display("die shows {}, must be between 1 and 6", _0)]
    InvalidDie(u8),

    /// Move that matches the dice but is illegal on the board.
    #[display("{} is not allowed: {}", mv, source)]
    IllegalMove {
        /// The rejected move.
        mv: Move,
        /// Why the row refused it.
        source: RowError,
    },
}

impl std::error::Error for TurnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurnError::IllegalMove { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::qwixx::RowColor;

    #[test]
    fn test_empty_active_turn_is_penalty() {
        assert!(ActivePlayerTurn::penalty().is_penalty());
    }

    #[test]
    fn test_any_move_is_not_penalty() {
        let white = ActivePlayerTurn::new(Some(Move::new(RowColor::Blue, 5)), None);
        let color = ActivePlayerTurn::new(None, Some(Move::new(RowColor::Yellow, 9)));
        let both = ActivePlayerTurn::new(
            Some(Move::new(RowColor::Red, 8)),
            Some(Move::new(RowColor::Green, 3)),
        );
        assert!(!white.is_penalty());
        assert!(!color.is_penalty());
        assert!(!both.is_penalty());
    }

    #[test]
    fn test_moves_white_first() {
        let turn = ActivePlayerTurn::new(
            Some(Move::new(RowColor::Red, 8)),
            Some(Move::new(RowColor::Green, 3)),
        );
        let moves: Vec<_> = turn.moves().collect();
        assert_eq!(
            moves,
            vec![Move::new(RowColor::Red, 8), Move::new(RowColor::Green, 3)]
        );
    }

    #[test]
    fn test_locked_errors_are_distinct() {
        assert_ne!(RowError::AlreadyLocked, RowError::RowIsLocked);
        assert!(RowError::AlreadyLocked.is_locked());
        assert!(RowError::RowIsLocked.is_locked());
        assert!(!RowError::CellAlreadyMarked(3).is_locked());
        assert_eq!(
            RowError::AlreadyLocked.to_string(),
            "cannot make move, row is already locked"
        );
        assert_eq!(RowError::RowIsLocked.to_string(), "row is locked");
    }

    #[test]
    fn test_turn_display() {
        let turn = ActivePlayerTurn::new(Some(Move::new(RowColor::Red, 8)), None);
        assert_eq!(turn.to_string(), "white: (Red 8), color: none");
    }
}
