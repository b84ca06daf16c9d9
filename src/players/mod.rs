//! Player trait and implementations.

mod bad_actor;
mod computer;
mod human;
mod scripted;

pub use bad_actor::BadActorPlayer;
pub use computer::ComputerPlayer;
pub use human::{HumanPlayer, ParseTurnError, parse_active_turn, parse_inactive_turn};
pub use scripted::{Notification, NotificationLog, ScriptedPlayer};

use crate::games::qwixx::{ActivePlayerTurn, Board, DiceRoll, InactivePlayerTurn, Move, RowColor};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Opaque identifier the runner assigns to each seat at the table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
pub struct PlayerId(uuid::Uuid);

impl PlayerId {
    /// Wraps a UUID.
    pub fn new(id: uuid::Uuid) -> Self {
        Self(id)
    }
}

/// Something that can sit at a Qwixx table.
///
/// Every board a player receives is its own copy; changing it has no effect
/// on the game. Proposals may take as long as they need; the runner awaits
/// them one at a time.
#[async_trait::async_trait]
pub trait Player: Send {
    /// Display name.
    fn name(&self) -> &str;

    /// Proposes a turn after rolling the dice: a white move, a color move,
    /// both, or neither (a penalty).
    async fn propose_active_turn(
        &mut self,
        board: Board,
        roll: DiceRoll,
    ) -> Result<ActivePlayerTurn>;

    /// Proposes an optional white dice move on another player's roll.
    async fn propose_inactive_turn(
        &mut self,
        board: Board,
        roll: DiceRoll,
    ) -> Result<InactivePlayerTurn>;

    /// Announces the seating order by name.
    fn on_play_order(&mut self, _names: &[String]) {}

    /// Another player crossed off `mv`.
    fn on_opponent_move(&mut self, _player: PlayerId, _mv: Move) {}

    /// Row `color` is now locked for everyone.
    fn on_row_locked(&mut self, _color: RowColor) {}

    /// This player has (or shares) the top score.
    fn on_win(&mut self) {}

    /// Someone else won; `winners` holds every top scorer.
    fn on_loss(&mut self, _winners: &[PlayerId]) {}
}
