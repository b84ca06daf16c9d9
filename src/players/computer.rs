//! Computer player that takes the first legal crossing it finds.

use super::{Player, PlayerId};
use crate::games::qwixx::{
    ActivePlayerTurn, Board, DiceRoll, InactivePlayerTurn, Move, RowColor, possible_color_moves,
    possible_white_moves,
};
use anyhow::Result;
use tracing::{debug, info, instrument};

/// Picks the first legal white move, then the first color move still legal after it.
#[derive(Debug, Clone)]
pub struct ComputerPlayer {
    name: String,
}

impl ComputerPlayer {
    /// Creates a new computer player.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn first_legal(board: &Board, candidates: &[Move]) -> Option<Move> {
    candidates.iter().copied().find(|&mv| board.is_move_valid(mv))
}

#[async_trait::async_trait]
impl Player for ComputerPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, board), fields(player = %self.name))]
    async fn propose_active_turn(
        &mut self,
        mut board: Board,
        roll: DiceRoll,
    ) -> Result<ActivePlayerTurn> {
        let white = first_legal(&board, &possible_white_moves(&roll));
        if let Some(mv) = white {
            // our own copy; lets the color pick see the white crossing
            board.make_move(mv)?;
        }
        let color = first_legal(&board, &possible_color_moves(&roll));
        let turn = ActivePlayerTurn::new(white, color);
        debug!(%turn, "Computer chose active turn");
        Ok(turn)
    }

    #[instrument(skip(self, board), fields(player = %self.name))]
    async fn propose_inactive_turn(
        &mut self,
        board: Board,
        roll: DiceRoll,
    ) -> Result<InactivePlayerTurn> {
        let turn = InactivePlayerTurn::new(first_legal(&board, &possible_white_moves(&roll)));
        debug!(%turn, "Computer chose inactive turn");
        Ok(turn)
    }

    fn on_play_order(&mut self, names: &[String]) {
        debug!(player = %self.name, order = ?names, "Play order announced");
    }

    fn on_opponent_move(&mut self, player: PlayerId, mv: Move) {
        debug!(player = %self.name, opponent = %player, %mv, "Opponent moved");
    }

    fn on_row_locked(&mut self, color: RowColor) {
        debug!(player = %self.name, row = %color, "Row locked");
    }

    fn on_win(&mut self) {
        info!(player = %self.name, "Won the game");
    }

    fn on_loss(&mut self, winners: &[PlayerId]) {
        info!(player = %self.name, ?winners, "Lost the game");
    }
}
