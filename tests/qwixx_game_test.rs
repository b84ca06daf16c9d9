//! End-to-end games through the runner.

use std::sync::{Arc, Mutex};
use strictly_qwixx::{
    ActivePlayerTurn, BadActorPlayer, Board, ComputerPlayer, DiceRoll, EndReason, GameRules,
    GameRunner, InactivePlayerTurn, Move, Notification, Orientation, Outcome, Player, PlayerId,
    Row, RowColor, ScriptedPlayer,
};

/// Computer player that also records what the runner told it.
struct RecordingComputer {
    inner: ComputerPlayer,
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingComputer {
    fn new(name: &str) -> (Self, Arc<Mutex<Vec<Notification>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let player = Self {
            inner: ComputerPlayer::new(name),
            seen: Arc::clone(&seen),
        };
        (player, seen)
    }
}

#[async_trait::async_trait]
impl Player for RecordingComputer {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn propose_active_turn(
        &mut self,
        board: Board,
        roll: DiceRoll,
    ) -> anyhow::Result<ActivePlayerTurn> {
        self.inner.propose_active_turn(board, roll).await
    }

    async fn propose_inactive_turn(
        &mut self,
        board: Board,
        roll: DiceRoll,
    ) -> anyhow::Result<InactivePlayerTurn> {
        self.inner.propose_inactive_turn(board, roll).await
    }

    fn on_play_order(&mut self, names: &[String]) {
        self.seen.lock().unwrap().push(Notification::PlayOrder(names.to_vec()));
    }

    fn on_opponent_move(&mut self, player: PlayerId, mv: Move) {
        self.seen.lock().unwrap().push(Notification::OpponentMove(player, mv));
    }

    fn on_row_locked(&mut self, color: RowColor) {
        self.seen.lock().unwrap().push(Notification::RowLocked(color));
    }

    fn on_win(&mut self) {
        self.seen.lock().unwrap().push(Notification::Win);
    }

    fn on_loss(&mut self, winners: &[PlayerId]) {
        self.seen.lock().unwrap().push(Notification::Loss(winners.to_vec()));
    }
}

#[tokio::test]
async fn test_three_computers_finish() {
    for seed in [1, 2, 3, 42] {
        let players: Vec<Box<dyn Player>> = vec![
            Box::new(ComputerPlayer::new("alice")),
            Box::new(ComputerPlayer::new("bob")),
            Box::new(ComputerPlayer::new("carol")),
        ];
        let summary = GameRunner::new(players, GameRules::default(), Some(seed))
            .run()
            .await
            .unwrap();

        assert!(*summary.turns_played() <= 1000);
        assert_eq!(summary.players().len(), 3);
        let top = summary.players().iter().map(|p| *p.score()).max().unwrap();
        let winners = summary.outcome().winners();
        assert!(!winners.is_empty());
        for player in summary.players() {
            assert_eq!(winners.contains(player.id()), *player.score() == top);
            assert_eq!(*player.score(), player.board().calculate_score());
        }
        match summary.reason() {
            EndReason::Locks => assert!(summary.locked_rows().len() >= 2),
            EndReason::Penalties => {
                assert!(summary.players().iter().any(|p| *p.penalties() >= 4))
            }
            EndReason::TurnLimit => assert_eq!(*summary.turns_played(), 1000),
        }
    }
}

#[tokio::test]
async fn test_same_seed_same_game() {
    let play = || async {
        let players: Vec<Box<dyn Player>> = vec![
            Box::new(ComputerPlayer::new("alice")),
            Box::new(ComputerPlayer::new("bob")),
        ];
        GameRunner::new(players, GameRules::default(), Some(11))
            .run()
            .await
            .unwrap()
    };
    assert_eq!(play().await, play().await);
}

#[tokio::test]
async fn test_locks_and_moves_reach_everyone() {
    let (observer, seen) = RecordingComputer::new("observer");
    let players: Vec<Box<dyn Player>> = vec![
        Box::new(observer),
        Box::new(ComputerPlayer::new("alice")),
        Box::new(ComputerPlayer::new("bob")),
    ];
    // this seed ends with green and blue locked
    let summary = GameRunner::new(players, GameRules::default(), Some(3))
        .run()
        .await
        .unwrap();
    let seen = seen.lock().unwrap().clone();

    assert!(matches!(seen.first(), Some(Notification::PlayOrder(names)) if names.len() == 3));
    assert_eq!(*summary.reason(), EndReason::Locks);
    assert!(!summary.locked_rows().is_empty());

    // every locked row is locked on every board
    for color in summary.locked_rows() {
        for player in summary.players() {
            assert!(player.board().is_row_locked(*color), "{color} open for {}", player.name());
        }
    }
    let mut announced: Vec<RowColor> = seen
        .iter()
        .filter_map(|n| match n {
            Notification::RowLocked(color) => Some(*color),
            _ => None,
        })
        .collect();
    announced.sort();
    assert_eq!(&announced, summary.locked_rows());

    // one notification per cell an opponent crossed
    let opponent_moves = seen
        .iter()
        .filter(|n| matches!(n, Notification::OpponentMove(..)))
        .count();
    let opponent_cells: usize = summary
        .players()
        .iter()
        .filter(|p| p.name() != "observer")
        .map(|p| {
            RowColor::ALL
                .iter()
                .map(|&c| p.board().row(c).crossed_count())
                .sum::<usize>()
        })
        .sum();
    assert_eq!(opponent_moves, opponent_cells);

    let last = seen.last().unwrap();
    assert!(matches!(last, Notification::Win | Notification::Loss(_)));
}

#[tokio::test]
async fn test_two_locks_in_one_roll_end_the_game() {
    // red and yellow crossed 2-6: a white 12 may cross either lock cell
    let ready = Row::from_cells(
        Orientation::Ascending,
        [true, true, true, true, true, false, false, false, false, false, false],
        false,
    );
    let board = Board::new()
        .with_row(RowColor::Red, ready.clone())
        .with_row(RowColor::Yellow, ready);

    let names = ["ann", "ben", "cat"];
    let players: Vec<ScriptedPlayer> = names
        .iter()
        .map(|name| {
            ScriptedPlayer::new(*name)
                .with_active_turns([ActivePlayerTurn::new(Some(Move::new(RowColor::Red, 12)), None)])
                .with_inactive_turns([InactivePlayerTurn::new(Some(Move::new(RowColor::Yellow, 12)))])
        })
        .collect();
    let logs: Vec<_> = players.iter().map(ScriptedPlayer::log).collect();

    let mut runner = GameRunner::new(
        players.into_iter().map(|p| Box::new(p) as Box<dyn Player>).collect(),
        GameRules::default(),
        Some(6),
    )
    .with_rolls([DiceRoll::new(6, 6, 1, 1, 1, 1)]);
    for name in names {
        runner = runner.with_board(name, board.clone());
    }
    let summary = runner.run().await.unwrap();

    assert_eq!(*summary.reason(), EndReason::Locks);
    assert_eq!(*summary.turns_played(), 1);
    assert_eq!(summary.locked_rows(), &vec![RowColor::Red, RowColor::Yellow]);
    for player in summary.players() {
        assert!(player.board().is_row_locked(RowColor::Red));
        assert!(player.board().is_row_locked(RowColor::Yellow));
    }
    // only the active player had no white 12 on yellow; its row was locked from outside
    let yellow_locked_from_outside = summary
        .players()
        .iter()
        .filter(|p| !p.board().is_cell_marked(RowColor::Yellow, 12))
        .count();
    assert_eq!(yellow_locked_from_outside, 1);

    for log in &logs {
        let entries = log.entries();
        for color in [RowColor::Red, RowColor::Yellow] {
            let announced = entries
                .iter()
                .filter(|n| **n == Notification::RowLocked(color))
                .count();
            assert_eq!(announced, 1, "{color} announced {announced} times");
        }
    }
}

#[tokio::test]
async fn test_bad_actor_cannot_touch_its_board() {
    let players: Vec<Box<dyn Player>> = vec![
        Box::new(ComputerPlayer::new("alice")),
        Box::new(BadActorPlayer::new("mallory")),
        Box::new(ComputerPlayer::new("bob")),
    ];
    let summary = GameRunner::new(players, GameRules::default(), Some(8))
        .run()
        .await
        .unwrap();

    let seat = summary
        .players()
        .iter()
        .position(|p| p.name() == "mallory")
        .unwrap();
    let mallory = &summary.players()[seat];
    for color in RowColor::ALL {
        assert_eq!(mallory.board().row(color).crossed_count(), 0);
    }
    assert_eq!(*mallory.score(), 0);

    // every active turn ends in a forced penalty
    let active_turns = (0..*summary.turns_played())
        .filter(|turn| *turn as usize % 3 == seat)
        .count();
    assert_eq!(*mallory.penalties() as usize, active_turns);
    assert!(*mallory.penalties() <= 4);
}

#[tokio::test]
async fn test_tie_notifies_every_top_scorer() {
    let first = ScriptedPlayer::new("first");
    let second = ScriptedPlayer::new("second");
    let (first_log, second_log) = (first.log(), second.log());
    let first_boards = first.boards_seen();

    let players: Vec<Box<dyn Player>> = vec![Box::new(first), Box::new(second)];
    let summary = GameRunner::new(players, GameRules::default(), Some(2))
        .run()
        .await
        .unwrap();

    // both pass every turn: the first seat reaches four penalties on turn seven
    assert_eq!(*summary.reason(), EndReason::Penalties);
    assert_eq!(*summary.turns_played(), 7);
    assert!(matches!(summary.outcome(), Outcome::Tie(ids) if ids.len() == 2));
    assert_eq!(first_log.entries().last(), Some(&Notification::Win));
    assert_eq!(second_log.entries().last(), Some(&Notification::Win));

    // seven turns: one prompt each, active or inactive
    let boards = first_boards.lock().unwrap();
    assert_eq!(boards.len(), 7);
    assert!(boards.iter().all(|b| *b == Board::new()));
}

#[tokio::test]
async fn test_failed_attempts_force_penalty() {
    // three illegal proposals use up every attempt
    let bogus = ActivePlayerTurn::new(Some(Move::new(RowColor::Red, 13)), None);
    let player = ScriptedPlayer::new("clumsy").with_active_turns([bogus, bogus, bogus]);
    let boards = player.boards_seen();

    let rules = GameRules::new(1, 3, 4, 2);
    let summary = GameRunner::new(vec![Box::new(player)], rules, Some(4))
        .run()
        .await
        .unwrap();

    assert_eq!(*summary.reason(), EndReason::TurnLimit);
    assert_eq!(*summary.players()[0].penalties(), 1);
    assert_eq!(boards.lock().unwrap().len(), 3);
}
