//! Turn lifecycle as a typestate.
//!
//! A proposal becomes a [`Validated`] turn only by passing the rules for a
//! specific board and roll. Only validated turns can be applied, and
//! applying consumes them, so a turn is never applied twice.

use super::action::{ActivePlayerTurn, InactivePlayerTurn, TurnError};
use super::board::Board;
use super::dice::DiceRoll;
use super::row::Crossing;
use super::rules::{apply_active_player_turn, check_active_turn, check_inactive_turn};
use super::types::{Move, RowColor};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A turn that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T> {
    turn: T,
}

impl<T> Validated<T> {
    /// The validated proposal.
    pub fn turn(&self) -> &T {
        &self.turn
    }
}

/// Board changes made by an applied turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTurn {
    /// Moves crossed off, in application order.
    pub crossed: Vec<Move>,
    /// Rows this turn locked by crossing their last cell.
    pub locked: Vec<RowColor>,
}

impl AppliedTurn {
    fn record(crossings: Vec<(Move, Crossing)>) -> Self {
        let mut applied = Self::default();
        for (mv, crossing) in crossings {
            applied.crossed.push(mv);
            if crossing == Crossing::Lock {
                applied.locked.push(mv.row);
            }
        }
        applied
    }
}

/// How a validated turn ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    /// At least one cell was crossed.
    Applied(AppliedTurn),
    /// The active player crossed nothing and takes a penalty.
    Penalty,
    /// An inactive player declined to move.
    Skipped,
}

impl Validated<ActivePlayerTurn> {
    /// Validates an active player's proposal.
    #[instrument(skip(board), fields(turn = %turn))]
    pub fn check(
        board: &Board,
        roll: &DiceRoll,
        turn: ActivePlayerTurn,
    ) -> Result<Self, TurnError> {
        check_active_turn(board, roll, &turn)?;
        Ok(Self { turn })
    }

    /// A penalty is legal on any board and roll.
    pub fn penalty() -> Self {
        Self {
            turn: ActivePlayerTurn::penalty(),
        }
    }

    /// Applies the turn, white move first.
    ///
    /// The board must be the one the turn was validated against; the turn
    /// is applied to a copy and only written back if every move succeeds.
    #[instrument(skip(self, board), fields(turn = %self.turn))]
    pub fn apply(self, board: &mut Board) -> Result<TurnOutcome, TurnError> {
        if self.turn.is_penalty() {
            return Ok(TurnOutcome::Penalty);
        }
        let mut working = board.clone();
        let crossings = apply_active_player_turn(&mut working, &self.turn)?;
        *board = working;
        Ok(TurnOutcome::Applied(AppliedTurn::record(crossings)))
    }
}

impl Validated<InactivePlayerTurn> {
    /// Validates an inactive player's proposal.
    #[instrument(skip(board), fields(turn = %turn))]
    pub fn check(
        board: &Board,
        roll: &DiceRoll,
        turn: InactivePlayerTurn,
    ) -> Result<Self, TurnError> {
        check_inactive_turn(board, roll, &turn)?;
        Ok(Self { turn })
    }

    /// Passing is legal on any board and roll.
    pub fn pass() -> Self {
        Self {
            turn: InactivePlayerTurn::pass(),
        }
    }

    /// Applies the white move if there is one.
    #[instrument(skip(self, board), fields(turn = %self.turn))]
    pub fn apply(self, board: &mut Board) -> Result<TurnOutcome, TurnError> {
        let Some(mv) = self.turn.white_dice_move else {
            return Ok(TurnOutcome::Skipped);
        };
        let crossing = board
            .make_move(mv)
            .map_err(|source| TurnError::IllegalMove { mv, source })?;
        Ok(TurnOutcome::Applied(AppliedTurn::record(vec![(mv, crossing)])))
    }
}
