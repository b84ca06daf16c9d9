//! Player that tries to break the game, for testing the runner's defenses.

use super::Player;
use crate::games::qwixx::{
    ActivePlayerTurn, Board, DiceRoll, InactivePlayerTurn, Move, RowColor,
};
use anyhow::Result;
use tracing::debug;

/// Scribbles on every board it is shown and proposes moves the dice never allow.
///
/// As the active player it crosses red 2 through 11 on its copy and then
/// proposes red 12 as a white move, which only a copy-backed runner can
/// refuse. As an inactive player it proposes a cell the white dice cannot
/// make.
#[derive(Debug, Clone)]
pub struct BadActorPlayer {
    name: String,
}

impl BadActorPlayer {
    /// Creates a new bad actor.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn scribble(board: &mut Board) {
    for n in 2..=11 {
        // failures are expected once the row is partly crossed
        let _ = board.make_move(Move::new(RowColor::Red, n));
    }
}

#[async_trait::async_trait]
impl Player for BadActorPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn propose_active_turn(
        &mut self,
        mut board: Board,
        _roll: DiceRoll,
    ) -> Result<ActivePlayerTurn> {
        scribble(&mut board);
        debug!(player = %self.name, "Bad actor scribbled on its board copy");
        Ok(ActivePlayerTurn::new(Some(Move::new(RowColor::Red, 12)), None))
    }

    async fn propose_inactive_turn(
        &mut self,
        mut board: Board,
        roll: DiceRoll,
    ) -> Result<InactivePlayerTurn> {
        scribble(&mut board);
        // any number except the white sum
        let wrong = if roll.sums().white == 7 { 8 } else { 7 };
        Ok(InactivePlayerTurn::new(Some(Move::new(RowColor::Blue, wrong))))
    }
}
