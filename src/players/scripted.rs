//! Deterministic player that replays queued turns, for tests and demos.

use super::{Player, PlayerId};
use crate::games::qwixx::{ActivePlayerTurn, Board, DiceRoll, InactivePlayerTurn, Move, RowColor};
use anyhow::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Something the runner told a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Seating order by name.
    PlayOrder(Vec<String>),
    /// An opponent crossed a cell.
    OpponentMove(PlayerId, Move),
    /// A row was locked for everyone.
    RowLocked(RowColor),
    /// This player won.
    Win,
    /// This player lost to `winners`.
    Loss(Vec<PlayerId>),
}

/// Shared record of notifications, readable after the player has been
/// handed to a runner.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog(Arc<Mutex<Vec<Notification>>>);

impl NotificationLog {
    fn push(&self, notification: Notification) {
        match self.0.lock() {
            Ok(mut log) => log.push(notification),
            Err(_) => warn!("Notification log poisoned"),
        }
    }

    /// Everything received so far, oldest first.
    pub fn entries(&self) -> Vec<Notification> {
        self.0.lock().map(|log| log.clone()).unwrap_or_default()
    }
}

/// Plays queued turns in order, then penalties (active) and passes (inactive).
///
/// Also counts the prompts it received and keeps every board it was shown.
#[derive(Debug)]
pub struct ScriptedPlayer {
    name: String,
    active: VecDeque<ActivePlayerTurn>,
    inactive: VecDeque<InactivePlayerTurn>,
    log: NotificationLog,
    boards_seen: Arc<Mutex<Vec<Board>>>,
}

impl ScriptedPlayer {
    /// Creates a player with empty scripts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: VecDeque::new(),
            inactive: VecDeque::new(),
            log: NotificationLog::default(),
            boards_seen: Arc::default(),
        }
    }

    /// Queues active turns.
    pub fn with_active_turns(mut self, turns: impl IntoIterator<Item = ActivePlayerTurn>) -> Self {
        self.active.extend(turns);
        self
    }

    /// Queues inactive turns.
    pub fn with_inactive_turns(
        mut self,
        turns: impl IntoIterator<Item = InactivePlayerTurn>,
    ) -> Self {
        self.inactive.extend(turns);
        self
    }

    /// Handle on this player's notifications.
    pub fn log(&self) -> NotificationLog {
        self.log.clone()
    }

    /// Handle on the boards this player was prompted with.
    pub fn boards_seen(&self) -> Arc<Mutex<Vec<Board>>> {
        Arc::clone(&self.boards_seen)
    }

    fn remember(&self, board: Board) {
        if let Ok(mut seen) = self.boards_seen.lock() {
            seen.push(board);
        }
    }
}

#[async_trait::async_trait]
impl Player for ScriptedPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn propose_active_turn(
        &mut self,
        board: Board,
        _roll: DiceRoll,
    ) -> Result<ActivePlayerTurn> {
        self.remember(board);
        let turn = self.active.pop_front().unwrap_or_default();
        debug!(player = %self.name, %turn, "Scripted active turn");
        Ok(turn)
    }

    async fn propose_inactive_turn(
        &mut self,
        board: Board,
        _roll: DiceRoll,
    ) -> Result<InactivePlayerTurn> {
        self.remember(board);
        let turn = self.inactive.pop_front().unwrap_or_default();
        debug!(player = %self.name, %turn, "Scripted inactive turn");
        Ok(turn)
    }

    fn on_play_order(&mut self, names: &[String]) {
        self.log.push(Notification::PlayOrder(names.to_vec()));
    }

    fn on_opponent_move(&mut self, player: PlayerId, mv: Move) {
        self.log.push(Notification::OpponentMove(player, mv));
    }

    fn on_row_locked(&mut self, color: RowColor) {
        self.log.push(Notification::RowLocked(color));
    }

    fn on_win(&mut self) {
        self.log.push(Notification::Win);
    }

    fn on_loss(&mut self, winners: &[PlayerId]) {
        self.log.push(Notification::Loss(winners.to_vec()));
    }
}
