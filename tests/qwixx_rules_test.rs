//! Tests for dice sums and turn validation.

use strictly_qwixx::rules::{
    apply_active_player_turn, check_active_turn, check_inactive_turn, is_active_turn_valid,
};
use strictly_qwixx::{
    ActivePlayerTurn, Board, DiceRoll, InactivePlayerTurn, Move, RowColor, RowError, TurnError,
    TurnOutcome, Validated, possible_color_moves, possible_white_moves,
};

#[test]
fn test_sum_derivation() {
    let roll = DiceRoll::new(4, 5, 2, 1, 1, 1);
    let sums = roll.sums();
    assert_eq!(sums.white, 9);
    assert_eq!(sums.for_color(RowColor::Red), (6, 7));

    let white = possible_white_moves(&roll);
    assert!(white.iter().all(|mv| mv.cell_number == 9));
    let red: Vec<u8> = possible_color_moves(&roll)
        .iter()
        .filter(|mv| mv.row == RowColor::Red)
        .map(|mv| mv.cell_number)
        .collect();
    assert_eq!(red, vec![6, 7]);
}

#[test]
fn test_penalty_always_valid() {
    let mut board = Board::new();
    for color in RowColor::ALL {
        board.lock_row(color);
    }
    let roll = DiceRoll::new(1, 1, 1, 1, 1, 1);
    assert!(is_active_turn_valid(&board, &roll, &ActivePlayerTurn::penalty()));
    assert_eq!(check_inactive_turn(&board, &roll, &InactivePlayerTurn::pass()), Ok(()));
}

#[test]
fn test_color_move_checked_after_white_move() {
    // white sum 5, red offers 4 and 5
    let roll = DiceRoll::new(2, 3, 2, 1, 1, 1);
    let board = Board::new();
    let turn = ActivePlayerTurn::new(
        Some(Move::new(RowColor::Red, 5)),
        Some(Move::new(RowColor::Red, 4)),
    );
    assert_eq!(
        check_active_turn(&board, &roll, &turn),
        Err(TurnError::IllegalMove {
            mv: Move::new(RowColor::Red, 4),
            source: RowError::CellOutOfOrder(4),
        })
    );
    // validation never touches the board
    assert_eq!(board, Board::new());

    let same_cell_twice = ActivePlayerTurn::new(
        Some(Move::new(RowColor::Red, 5)),
        Some(Move::new(RowColor::Red, 5)),
    );
    assert!(matches!(
        check_active_turn(&board, &roll, &same_cell_twice),
        Err(TurnError::IllegalMove {
            source: RowError::CellAlreadyMarked(5),
            ..
        })
    ));
}

#[test]
fn test_sum_mismatch_is_reported() {
    let roll = DiceRoll::new(6, 6, 1, 1, 1, 1);
    let board = Board::new();
    let turn = ActivePlayerTurn::new(None, Some(Move::new(RowColor::Yellow, 12)));
    assert_eq!(
        check_active_turn(&board, &roll, &turn),
        Err(TurnError::ColorSumMismatch(Move::new(RowColor::Yellow, 12)))
    );
}

#[test]
fn test_apply_leaves_partial_changes_on_error() {
    let mut board = Board::new();
    board.make_move(Move::new(RowColor::Blue, 4)).unwrap();
    // unchecked: white move fine, color move out of order
    let turn = ActivePlayerTurn::new(
        Some(Move::new(RowColor::Red, 7)),
        Some(Move::new(RowColor::Blue, 9)),
    );
    let result = apply_active_player_turn(&mut board, &turn);
    assert!(result.is_err());
    assert!(board.is_cell_marked(RowColor::Red, 7));
    assert!(!board.is_cell_marked(RowColor::Blue, 9));
}

#[test]
fn test_validated_turn_applies_both_moves() {
    let roll = DiceRoll::new(3, 5, 1, 4, 3, 2);
    let mut board = Board::new();
    let turn = ActivePlayerTurn::new(
        Some(Move::new(RowColor::Red, 8)),
        Some(Move::new(RowColor::Green, 6)),
    );
    let outcome = Validated::<ActivePlayerTurn>::check(&board, &roll, turn)
        .unwrap()
        .apply(&mut board)
        .unwrap();
    match outcome {
        TurnOutcome::Applied(applied) => {
            assert_eq!(
                applied.crossed,
                vec![Move::new(RowColor::Red, 8), Move::new(RowColor::Green, 6)]
            );
            assert!(applied.locked.is_empty());
        }
        other => panic!("expected applied turn, got {other:?}"),
    }
    assert_eq!(board.calculate_score(), 2);
}
