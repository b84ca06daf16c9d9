//! Game orchestration: dice, prompts, validation, and the end of the game.

use crate::game_config::GameRules;
use crate::games::qwixx::{
    ActivePlayerTurn, Board, DiceRoll, InactivePlayerTurn, Move, RowColor, TurnOutcome,
    Validated, roll_dice,
};
use crate::players::{Player, PlayerId};
use anyhow::{Context, Result};
use derive_getters::Getters;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, VecDeque};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Messages sent from the runner to a front end.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Seating order by name.
    PlayOrder(Vec<String>),
    /// A new turn began.
    TurnStarted {
        /// Zero-based turn number.
        turn: u32,
        /// Active player's name.
        player: String,
    },
    /// Dice for the current turn.
    DiceRolled(DiceRoll),
    /// A player's validated turn was applied.
    TurnPlayed {
        /// Player name.
        player: String,
        /// What changed.
        outcome: TurnOutcome,
    },
    /// A proposal failed validation (or application).
    ProposalRejected {
        /// Player name.
        player: String,
        /// One-based attempt number within this prompt.
        attempt: u32,
        /// Why it was refused.
        reason: String,
    },
    /// The active player took a penalty.
    Penalty {
        /// Player name.
        player: String,
        /// Penalties so far.
        total: u32,
    },
    /// A row is now locked for everyone.
    RowLocked(RowColor),
    /// A board changed; carries its rendering.
    BoardChanged {
        /// Player name.
        player: String,
        /// Rendered board.
        board: String,
    },
    /// The game ended.
    GameOver(GameSummary),
}

/// Why the game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum EndReason {
    /// Enough rows were locked.
    #[display("rows locked")]
    Locks,
    /// A player reached the penalty limit.
    #[display("penalty limit reached")]
    Penalties,
    /// The turn limit ran out.
    #[display("turn limit reached")]
    TurnLimit,
}

/// Who won.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A single top score.
    Winner(PlayerId),
    /// Several players share the top score.
    Tie(Vec<PlayerId>),
}

impl Outcome {
    /// Every player holding the top score.
    pub fn winners(&self) -> Vec<PlayerId> {
        match self {
            Outcome::Winner(id) => vec![*id],
            Outcome::Tie(ids) => ids.clone(),
        }
    }
}

/// Final standing of one player.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PlayerResult {
    /// Seat identifier.
    id: PlayerId,
    /// Display name.
    name: String,
    /// Board score.
    score: u32,
    /// Penalties taken.
    penalties: u32,
    /// Final board.
    board: Board,
}

/// Everything worth reporting once a game is over.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameSummary {
    /// Results in play order.
    players: Vec<PlayerResult>,
    /// Winner or tie.
    outcome: Outcome,
    /// Why the game stopped.
    reason: EndReason,
    /// Turns played.
    turns_played: u32,
    /// Globally locked rows.
    locked_rows: Vec<RowColor>,
}

impl GameSummary {
    /// Names of the top scorers.
    pub fn winner_names(&self) -> Vec<&str> {
        let winners = self.outcome.winners();
        self.players
            .iter()
            .filter(|p| winners.contains(&p.id))
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Per-game mutable state, owned by one runner.
#[derive(Debug, Clone, Default, Getters)]
pub struct GameState {
    /// Authoritative board of every player.
    boards: HashMap<PlayerId, Board>,
    /// Penalties per player.
    penalties: HashMap<PlayerId, u32>,
    /// Globally locked rows.
    locks: BTreeSet<RowColor>,
    /// Seating order.
    play_order: Vec<PlayerId>,
    /// Turns completed.
    turns_played: u32,
}

impl GameState {
    /// Reason the game is over, if it is.
    pub fn end_reason(&self, rules: &GameRules) -> Option<EndReason> {
        if self.locks.len() >= *rules.locks_to_end() {
            Some(EndReason::Locks)
        } else if self.penalties.values().any(|&n| n >= *rules.penalty_limit()) {
            Some(EndReason::Penalties)
        } else {
            None
        }
    }

    fn board_mut(&mut self, id: PlayerId) -> Result<&mut Board> {
        self.boards
            .get_mut(&id)
            .with_context(|| format!("No board for player {id}"))
    }
}

struct Seat {
    id: PlayerId,
    name: String,
    player: Box<dyn Player>,
}

#[derive(Clone, Default)]
struct EventSink(Option<mpsc::UnboundedSender<GameEvent>>);

impl EventSink {
    fn emit(&self, event: GameEvent) {
        if let Some(tx) = &self.0 {
            if tx.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }
}

/// Runs one game of Qwixx between any number of players.
pub struct GameRunner {
    seats: Vec<Seat>,
    state: GameState,
    rules: GameRules,
    rng: StdRng,
    loaded_rolls: VecDeque<DiceRoll>,
    events: EventSink,
}

impl GameRunner {
    /// Seats the players, assigns IDs, and shuffles the play order.
    ///
    /// With a seed, IDs, play order, and dice are reproducible.
    #[instrument(skip(players), fields(players = players.len()))]
    pub fn new(players: Vec<Box<dyn Player>>, rules: GameRules, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut seats: Vec<Seat> = players
            .into_iter()
            .map(|player| Seat {
                id: PlayerId::new(uuid::Builder::from_random_bytes(rng.random()).into_uuid()),
                name: player.name().to_string(),
                player,
            })
            .collect();
        seats.shuffle(&mut rng);

        let state = GameState {
            boards: seats.iter().map(|s| (s.id, Board::new())).collect(),
            play_order: seats.iter().map(|s| s.id).collect(),
            ..GameState::default()
        };

        Self {
            seats,
            state,
            rules,
            rng,
            loaded_rolls: VecDeque::new(),
            events: EventSink::default(),
        }
    }

    /// Starts every seat named `name` on `board` instead of a blank one.
    pub fn with_board(mut self, name: &str, board: Board) -> Self {
        for seat in self.seats.iter().filter(|s| s.name == name) {
            self.state.boards.insert(seat.id, board.clone());
        }
        self
    }

    /// Plays these rolls first, in order, before rolling the dice.
    pub fn with_rolls(mut self, rolls: impl IntoIterator<Item = DiceRoll>) -> Self {
        self.loaded_rolls.extend(rolls);
        self
    }

    /// Sends game events to `tx` while running.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        self.events = EventSink(Some(tx));
        self
    }

    /// Current state (boards, penalties, locks).
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Plays until the game is won or the turn limit runs out.
    ///
    /// Errors only come from players failing to answer a prompt.
    #[instrument(skip(self), fields(players = self.seats.len()))]
    pub async fn run(mut self) -> Result<GameSummary> {
        anyhow::ensure!(!self.seats.is_empty(), "A game needs at least one player");
        info!("Starting Qwixx game");
        self.announce_play_order();

        let reason = loop {
            if let Some(reason) = self.state.end_reason(&self.rules) {
                break reason;
            }
            if self.state.turns_played >= *self.rules.max_turns() {
                warn!(turns = self.state.turns_played, "Turn limit reached");
                break EndReason::TurnLimit;
            }
            let active = self.state.turns_played as usize % self.seats.len();
            self.run_single_turn(active).await?;
            self.state.turns_played += 1;
        };

        Ok(self.end_game(reason))
    }

    fn announce_play_order(&mut self) {
        let names: Vec<String> = self.seats.iter().map(|s| s.name.clone()).collect();
        info!(order = ?names, "Play order established");
        for seat in &mut self.seats {
            seat.player.on_play_order(&names);
        }
        self.events.emit(GameEvent::PlayOrder(names));
    }

    #[instrument(skip(self), fields(turn = self.state.turns_played))]
    async fn run_single_turn(&mut self, active: usize) -> Result<()> {
        let roll = match self.loaded_rolls.pop_front() {
            Some(roll) => {
                debug!(%roll, "Using loaded roll");
                roll
            }
            None => roll_dice(&mut self.rng),
        };
        let active_id = self.seats[active].id;
        let active_name = self.seats[active].name.clone();
        info!(player = %active_name, %roll, "Turn started");
        self.events.emit(GameEvent::TurnStarted {
            turn: self.state.turns_played,
            player: active_name.clone(),
        });
        self.events.emit(GameEvent::DiceRolled(roll));

        let mut newly_locked = Vec::new();

        let board = self.state.board_mut(active_id)?.clone();
        let validated = prompt_active(
            self.seats[active].player.as_mut(),
            &active_name,
            &board,
            roll,
            *self.rules.proposal_attempts(),
            &self.events,
        )
        .await?;
        let board = self.state.board_mut(active_id)?;
        let outcome = validated.apply(board)?;
        let rendered = board.print();
        match &outcome {
            TurnOutcome::Penalty => {
                let total = self.state.penalties.entry(active_id).or_default();
                *total += 1;
                let total = *total;
                info!(player = %active_name, total, "Penalty taken");
                self.events.emit(GameEvent::Penalty {
                    player: active_name.clone(),
                    total,
                });
            }
            TurnOutcome::Applied(applied) => {
                info!(player = %active_name, crossed = ?applied.crossed, "Active turn applied");
                newly_locked.extend(applied.locked.iter().copied());
                notify_opponents(&mut self.seats, active, &applied.crossed);
                self.events.emit(GameEvent::BoardChanged {
                    player: active_name.clone(),
                    board: rendered,
                });
            }
            TurnOutcome::Skipped => {}
        }
        self.events.emit(GameEvent::TurnPlayed {
            player: active_name,
            outcome,
        });

        let seat_count = self.seats.len();
        for offset in 1..seat_count {
            let idx = (active + offset) % seat_count;
            let id = self.seats[idx].id;
            let name = self.seats[idx].name.clone();
            let board = self.state.board_mut(id)?.clone();
            let validated = prompt_inactive(
                self.seats[idx].player.as_mut(),
                &name,
                &board,
                roll,
                *self.rules.proposal_attempts(),
                &self.events,
            )
            .await?;

            let board = self.state.board_mut(id)?;
            match validated.apply(board) {
                Ok(TurnOutcome::Applied(applied)) => {
                    debug!(player = %name, crossed = ?applied.crossed, "Inactive turn applied");
                    newly_locked.extend(applied.locked.iter().copied());
                    let rendered = board.print();
                    notify_opponents(&mut self.seats, idx, &applied.crossed);
                    self.events.emit(GameEvent::BoardChanged {
                        player: name.clone(),
                        board: rendered,
                    });
                    self.events.emit(GameEvent::TurnPlayed {
                        player: name,
                        outcome: TurnOutcome::Applied(applied),
                    });
                }
                Ok(_) => {}
                // boards only change between check and apply if a lock lands
                // mid-roll, and locks are propagated after every seat has acted
                Err(e) => {
                    warn!(player = %name, error = %e, "Inactive move failed to apply, skipping");
                    self.events.emit(GameEvent::ProposalRejected {
                        player: name,
                        attempt: 0,
                        reason: e.to_string(),
                    });
                }
            }
        }

        for color in newly_locked {
            self.propagate_lock(color);
        }
        Ok(())
    }

    fn propagate_lock(&mut self, color: RowColor) {
        if !self.state.locks.insert(color) {
            return;
        }
        info!(row = %color, locks = self.state.locks.len(), "Row locked for everyone");
        for board in self.state.boards.values_mut() {
            board.lock_row(color);
        }
        for seat in &mut self.seats {
            seat.player.on_row_locked(color);
        }
        self.events.emit(GameEvent::RowLocked(color));
    }

    #[instrument(skip(self))]
    fn end_game(mut self, reason: EndReason) -> GameSummary {
        let players: Vec<PlayerResult> = self
            .seats
            .iter()
            .map(|seat| {
                let board = self.state.boards.remove(&seat.id).unwrap_or_default();
                PlayerResult {
                    id: seat.id,
                    name: seat.name.clone(),
                    score: board.calculate_score(),
                    penalties: self.state.penalties.get(&seat.id).copied().unwrap_or(0),
                    board,
                }
            })
            .collect();

        let top = players.iter().map(|p| p.score).max().unwrap_or(0);
        let winners: Vec<PlayerId> = players
            .iter()
            .filter(|p| p.score == top)
            .map(|p| p.id)
            .collect();
        let outcome = match winners.as_slice() {
            [only] => Outcome::Winner(*only),
            _ => Outcome::Tie(winners.clone()),
        };

        for seat in &mut self.seats {
            if winners.contains(&seat.id) {
                seat.player.on_win();
            } else {
                seat.player.on_loss(&winners);
            }
        }

        let summary = GameSummary {
            players,
            outcome,
            reason,
            turns_played: self.state.turns_played,
            locked_rows: self.state.locks.iter().copied().collect(),
        };
        info!(
            %reason,
            turns = summary.turns_played,
            winners = ?summary.winner_names(),
            top_score = top,
            "Game over"
        );
        self.events.emit(GameEvent::GameOver(summary.clone()));
        summary
    }
}

/// Tells every seat except `mover` about each crossed move.
fn notify_opponents(seats: &mut [Seat], mover: usize, crossed: &[Move]) {
    let mover_id = seats[mover].id;
    for (idx, seat) in seats.iter_mut().enumerate() {
        if idx == mover {
            continue;
        }
        for &mv in crossed {
            seat.player.on_opponent_move(mover_id, mv);
        }
    }
}

/// Asks the active player for a turn until one validates, forcing a
/// penalty once `attempts` proposals have failed.
async fn prompt_active(
    player: &mut dyn Player,
    name: &str,
    board: &Board,
    roll: DiceRoll,
    attempts: u32,
    events: &EventSink,
) -> Result<Validated<ActivePlayerTurn>> {
    for attempt in 1..=attempts {
        let proposal = player.propose_active_turn(board.clone(), roll).await?;
        match Validated::<ActivePlayerTurn>::check(board, &roll, proposal) {
            Ok(validated) => {
                debug!(player = %name, turn = %proposal, "Valid active turn");
                return Ok(validated);
            }
            Err(e) => {
                warn!(player = %name, attempt, turn = %proposal, error = %e, "Invalid active turn");
                events.emit(GameEvent::ProposalRejected {
                    player: name.to_string(),
                    attempt,
                    reason: e.to_string(),
                });
            }
        }
    }
    warn!(player = %name, attempts, "Too many invalid proposals, forcing a penalty");
    Ok(Validated::<ActivePlayerTurn>::penalty())
}

/// Asks an inactive player for an optional white move, forcing a pass once
/// `attempts` proposals have failed.
async fn prompt_inactive(
    player: &mut dyn Player,
    name: &str,
    board: &Board,
    roll: DiceRoll,
    attempts: u32,
    events: &EventSink,
) -> Result<Validated<InactivePlayerTurn>> {
    for attempt in 1..=attempts {
        let proposal = player.propose_inactive_turn(board.clone(), roll).await?;
        match Validated::<InactivePlayerTurn>::check(board, &roll, proposal) {
            Ok(validated) => return Ok(validated),
            Err(e) => {
                warn!(player = %name, attempt, turn = %proposal, error = %e, "Invalid inactive turn");
                events.emit(GameEvent::ProposalRejected {
                    player: name.to_string(),
                    attempt,
                    reason: e.to_string(),
                });
            }
        }
    }
    warn!(player = %name, attempts, "Too many invalid proposals, passing");
    Ok(Validated::<InactivePlayerTurn>::pass())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::{ComputerPlayer, ScriptedPlayer};

    fn rules(max_turns: u32) -> GameRules {
        GameRules::new(max_turns, 3, 4, 2)
    }

    #[test]
    fn test_end_reason() {
        let rules = rules(10);
        let mut state = GameState::default();
        assert_eq!(state.end_reason(&rules), None);

        state.locks.insert(RowColor::Red);
        assert_eq!(state.end_reason(&rules), None);
        state.locks.insert(RowColor::Blue);
        assert_eq!(state.end_reason(&rules), Some(EndReason::Locks));

        let mut state = GameState::default();
        state.penalties.insert(PlayerId::new(uuid::Uuid::nil()), 4);
        assert_eq!(state.end_reason(&rules), Some(EndReason::Penalties));
    }

    #[test]
    fn test_seeded_seating_is_reproducible() {
        let seat = |seed| {
            let players: Vec<Box<dyn Player>> = vec![
                Box::new(ComputerPlayer::new("a")),
                Box::new(ComputerPlayer::new("b")),
                Box::new(ComputerPlayer::new("c")),
            ];
            GameRunner::new(players, rules(10), Some(seed))
                .state()
                .play_order()
                .clone()
        };
        assert_eq!(seat(9), seat(9));
        assert_eq!(seat(9).len(), 3);
    }

    #[tokio::test]
    async fn test_locks_propagate_after_the_roll() {
        let mut board = Board::new();
        for color in [RowColor::Red, RowColor::Yellow] {
            for n in 2..=6 {
                board.make_move(Move::new(color, n)).unwrap();
            }
        }
        let lock_red = ActivePlayerTurn::new(Some(Move::new(RowColor::Red, 12)), None);
        let lock_yellow = InactivePlayerTurn::new(Some(Move::new(RowColor::Yellow, 12)));
        let players: Vec<Box<dyn Player>> = ["a", "b"]
            .into_iter()
            .map(|name| {
                Box::new(
                    ScriptedPlayer::new(name)
                        .with_active_turns([lock_red])
                        .with_inactive_turns([lock_yellow]),
                ) as Box<dyn Player>
            })
            .collect();
        let mut runner = GameRunner::new(players, rules(10), Some(1))
            .with_board("a", board.clone())
            .with_board("b", board)
            .with_rolls([DiceRoll::new(6, 6, 1, 1, 1, 1)]);

        runner.run_single_turn(0).await.unwrap();

        let state = runner.state();
        assert_eq!(
            state.locks().iter().copied().collect::<Vec<_>>(),
            vec![RowColor::Red, RowColor::Yellow]
        );
        let active = &state.boards()[&state.play_order()[0]];
        let inactive = &state.boards()[&state.play_order()[1]];
        for board in [active, inactive] {
            assert!(board.is_row_locked(RowColor::Red));
            assert!(board.is_row_locked(RowColor::Yellow));
        }
        // locked from outside: no lock cell crossed
        assert!(active.is_cell_marked(RowColor::Red, 12));
        assert!(!active.is_cell_marked(RowColor::Yellow, 12));
        assert!(inactive.is_cell_marked(RowColor::Yellow, 12));
        assert!(!inactive.is_cell_marked(RowColor::Red, 12));
        assert_eq!(state.end_reason(&rules(10)), Some(EndReason::Locks));
    }

    #[tokio::test]
    async fn test_penalties_end_the_game() {
        // a lone player who always passes takes a penalty every turn
        let players: Vec<Box<dyn Player>> = vec![Box::new(ScriptedPlayer::new("idle"))];
        let summary = GameRunner::new(players, rules(100), Some(1))
            .run()
            .await
            .unwrap();
        assert_eq!(*summary.reason(), EndReason::Penalties);
        assert_eq!(*summary.turns_played(), 4);
        assert_eq!(*summary.players()[0].penalties(), 4);
        assert_eq!(summary.winner_names(), vec!["idle"]);
    }

    #[tokio::test]
    async fn test_turn_limit() {
        let players: Vec<Box<dyn Player>> = vec![
            Box::new(ScriptedPlayer::new("a")),
            Box::new(ScriptedPlayer::new("b")),
        ];
        let summary = GameRunner::new(players, rules(3), Some(1)).run().await.unwrap();
        assert_eq!(*summary.reason(), EndReason::TurnLimit);
        assert_eq!(*summary.turns_played(), 3);
        // nobody crossed anything
        assert!(matches!(summary.outcome(), Outcome::Tie(ids) if ids.len() == 2));
    }

    #[tokio::test]
    async fn test_events_stream() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let players: Vec<Box<dyn Player>> = vec![Box::new(ScriptedPlayer::new("solo"))];
        GameRunner::new(players, rules(100), Some(3))
            .with_events(tx)
            .run()
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(matches!(events.first(), Some(GameEvent::PlayOrder(names)) if names == &vec!["solo".to_string()]));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Penalty { .. }))
                .count(),
            4
        );
        assert!(matches!(events.last(), Some(GameEvent::GameOver(_))));
    }
}
