//! Human player that types turns as text lines.

use super::{Player, PlayerId};
use crate::games::qwixx::{
    ActivePlayerTurn, Board, DiceRoll, InactivePlayerTurn, Move, RowColor, RowError,
};
use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// Why a typed turn could not be read.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum ParseTurnError {
    /// A move was malformed.
    #[display("{}", _0)]
    #[from]
    Move(RowError),

    /// Inactive players may only use the white dice.
    #[display("color move {} while inactive, only a white dice move is allowed", _0)]
    ColorMoveWhileInactive(Move),

    /// A turn holds at most one white dice move.
    #[display("second white dice move {}, a turn allows only one", _0)]
    SecondWhiteMove(Move),

    /// A turn holds at most one color dice move.
    #[display("second color dice move {}, a turn allows only one", _0)]
    SecondColorMove(Move),
}

impl std::error::Error for ParseTurnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseTurnError::Move(source) => Some(source),
            _ => None,
        }
    }
}

/// Parses an active turn.
///
/// Accepted forms: `pass`, `red 5` (white dice move), `color blue 4`,
/// `white red 9 color blue 4`. Naming a second move of the same kind is an
/// error.
#[instrument]
pub fn parse_active_turn(line: &str) -> Result<ActivePlayerTurn, ParseTurnError> {
    let words: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
    let mut turn = ActivePlayerTurn::penalty();
    let mut rest = words.as_slice();

    while !rest.is_empty() {
        match rest[0].as_str() {
            "pass" | "penalty" => rest = &rest[1..],
            "color" | "colour" => {
                let mv = parse_move(&rest[1..])?;
                if turn.color_dice_move.is_some() {
                    return Err(ParseTurnError::SecondColorMove(mv));
                }
                turn.color_dice_move = Some(mv);
                rest = rest.get(3..).unwrap_or_default();
            }
            word => {
                // `white` is optional before a white dice move
                let words = if word == "white" { &rest[1..] } else { rest };
                let mv = parse_move(words)?;
                if turn.white_dice_move.is_some() {
                    return Err(ParseTurnError::SecondWhiteMove(mv));
                }
                turn.white_dice_move = Some(mv);
                rest = words.get(2..).unwrap_or_default();
            }
        }
    }
    Ok(turn)
}

/// Parses an inactive turn: `pass`, `red 5`, or `white red 5`.
#[instrument]
pub fn parse_inactive_turn(line: &str) -> Result<InactivePlayerTurn, ParseTurnError> {
    let turn = parse_active_turn(line)?;
    match turn.color_dice_move {
        Some(mv) => Err(ParseTurnError::ColorMoveWhileInactive(mv)),
        None => Ok(InactivePlayerTurn::new(turn.white_dice_move)),
    }
}

fn parse_move(words: &[String]) -> Result<Move, RowError> {
    match words {
        [color, number, ..] => format!("{color} {number}").parse(),
        [color] => Err(color
            .parse::<RowColor>()
            .err()
            .unwrap_or(RowError::InvalidCellNumber(0))),
        [] => Err(RowError::InvalidRowColor(String::new())),
    }
}

/// Human player fed by a line channel (stdin in the CLI).
///
/// Prompts and parse errors go out on `prompt_tx` for the front end to show.
pub struct HumanPlayer {
    name: String,
    input_rx: mpsc::UnboundedReceiver<String>,
    prompt_tx: mpsc::UnboundedSender<String>,
}

impl HumanPlayer {
    /// Creates a new human player.
    pub fn new(
        name: impl Into<String>,
        input_rx: mpsc::UnboundedReceiver<String>,
        prompt_tx: mpsc::UnboundedSender<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input_rx,
            prompt_tx,
        }
    }

    fn say(&self, text: impl Into<String>) {
        if self.prompt_tx.send(text.into()).is_err() {
            warn!(player = %self.name, "Prompt channel closed");
        }
    }

    async fn read_turn<T>(&mut self, parse: fn(&str) -> Result<T, ParseTurnError>) -> Result<T> {
        while let Some(line) = self.input_rx.recv().await {
            match parse(&line) {
                Ok(turn) => return Ok(turn),
                Err(e) => self.say(format!("Could not read that: {e}")),
            }
        }
        anyhow::bail!("Input channel closed")
    }
}

#[async_trait::async_trait]
impl Player for HumanPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, board), fields(player = %self.name))]
    async fn propose_active_turn(
        &mut self,
        board: Board,
        roll: DiceRoll,
    ) -> Result<ActivePlayerTurn> {
        self.say(format!(
            "{}, your roll: {roll}\n{board}\nEnter e.g. `white red 9 color blue 4`, `red 9`, or `pass`:",
            self.name
        ));
        self.read_turn(parse_active_turn).await
    }

    #[instrument(skip(self, board), fields(player = %self.name))]
    async fn propose_inactive_turn(
        &mut self,
        board: Board,
        roll: DiceRoll,
    ) -> Result<InactivePlayerTurn> {
        self.say(format!(
            "{}, white sum is {} ({roll})\n{board}\nEnter e.g. `red {}` or `pass`:",
            self.name,
            roll.sums().white,
            roll.sums().white
        ));
        self.read_turn(parse_inactive_turn).await
    }

    fn on_play_order(&mut self, names: &[String]) {
        self.say(format!("Play order: {}", names.join(", ")));
    }

    fn on_opponent_move(&mut self, player: PlayerId, mv: Move) {
        self.say(format!("Player {player} crossed {mv}"));
    }

    fn on_row_locked(&mut self, color: RowColor) {
        self.say(format!("The {color} row is locked"));
    }

    fn on_win(&mut self) {
        info!(player = %self.name, "Human won");
        self.say("You won!");
    }

    fn on_loss(&mut self, winners: &[PlayerId]) {
        let names: Vec<String> = winners.iter().map(ToString::to_string).collect();
        self.say(format!("You lost. Winner: {}", names.join(", ")));
    }
}
