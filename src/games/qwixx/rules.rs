//! Turn legality for Qwixx.
//!
//! Pure functions that decide whether a proposed move or turn is allowed
//! for a board and a roll. A move is legal when it is one of the moves the
//! dice offer for its slot AND the board accepts it.

use super::action::{ActivePlayerTurn, InactivePlayerTurn, TurnError};
use super::board::Board;
use super::dice::{DiceRoll, possible_color_moves, possible_white_moves};
use super::row::Crossing;
use super::types::Move;
use tracing::{debug, instrument};

fn check_dice(roll: &DiceRoll) -> Result<(), TurnError> {
    match roll.faulty_die() {
        Some(value) => Err(TurnError::InvalidDie(value)),
        None => Ok(()),
    }
}

/// Checks a move made with the sum of the white dice.
#[instrument(skip(board), fields(mv = %mv))]
pub fn check_white_dice_move(board: &Board, roll: &DiceRoll, mv: Move) -> Result<(), TurnError> {
    check_dice(roll)?;
    if !possible_white_moves(roll).contains(&mv) {
        return Err(TurnError::WhiteSumMismatch(mv));
    }
    board
        .check_move(mv)
        .map_err(|source| TurnError::IllegalMove { mv, source })
}

/// Checks a move made with one white die plus the die of the move's row color.
#[instrument(skip(board), fields(mv = %mv))]
pub fn check_color_dice_move(board: &Board, roll: &DiceRoll, mv: Move) -> Result<(), TurnError> {
    check_dice(roll)?;
    if !possible_color_moves(roll).contains(&mv) {
        return Err(TurnError::ColorSumMismatch(mv));
    }
    board
        .check_move(mv)
        .map_err(|source| TurnError::IllegalMove { mv, source })
}

/// Checks an active player's turn.
///
/// A penalty is always valid. Otherwise the white move is checked against
/// `board`, applied to a working copy, and the color move is checked
/// against that copy, so a color move the white move just made illegal
/// fails the whole turn. `board` itself is never changed.
#[instrument(skip(board), fields(turn = %turn))]
pub fn check_active_turn(
    board: &Board,
    roll: &DiceRoll,
    turn: &ActivePlayerTurn,
) -> Result<(), TurnError> {
    if turn.is_penalty() {
        return Ok(());
    }

    let mut working = board.clone();

    if let Some(mv) = turn.white_dice_move {
        check_white_dice_move(&working, roll, mv)?;
        working
            .make_move(mv)
            .map_err(|source| TurnError::IllegalMove { mv, source })?;
    }

    if let Some(mv) = turn.color_dice_move {
        check_color_dice_move(&working, roll, mv)?;
    }

    debug!("Active turn is valid");
    Ok(())
}

/// Checks an inactive player's turn. Declining is always valid.
#[instrument(skip(board), fields(turn = %turn))]
pub fn check_inactive_turn(
    board: &Board,
    roll: &DiceRoll,
    turn: &InactivePlayerTurn,
) -> Result<(), TurnError> {
    match turn.white_dice_move {
        Some(mv) => check_white_dice_move(board, roll, mv),
        None => Ok(()),
    }
}

/// Boolean form of [`check_active_turn`].
pub fn is_active_turn_valid(board: &Board, roll: &DiceRoll, turn: &ActivePlayerTurn) -> bool {
    check_active_turn(board, roll, turn).is_ok()
}

/// Boolean form of [`check_inactive_turn`].
pub fn is_inactive_turn_valid(board: &Board, roll: &DiceRoll, turn: &InactivePlayerTurn) -> bool {
    check_inactive_turn(board, roll, turn).is_ok()
}

/// Applies the white move and then the color move to `board`.
///
/// Dice are not consulted. If the second move fails the first one stays
/// applied, so pass a disposable copy when the turn must be all-or-nothing.
#[instrument(skip(board), fields(turn = %turn))]
pub fn apply_active_player_turn(
    board: &mut Board,
    turn: &ActivePlayerTurn,
) -> Result<Vec<(Move, Crossing)>, TurnError> {
    let mut applied = Vec::with_capacity(2);
    for mv in turn.moves() {
        let crossing = board
            .make_move(mv)
            .map_err(|source| TurnError::IllegalMove { mv, source })?;
        applied.push((mv, crossing));
    }
    Ok(applied)
}
