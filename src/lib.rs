//! Strictly Qwixx library - rules-checked Qwixx
//!
//! Every crossing a player proposes is validated against the dice and the
//! player's authoritative board before it is applied; players only ever see
//! copies.
//!
//! # Architecture
//!
//! - **Games**: Qwixx rows, boards, dice, and turn validation
//! - **Players**: Computer, human (line input), scripted, and bad-actor players
//! - **Orchestrator**: The game runner that owns every board
//! - **Config**: Game limits and seats loaded from TOML
//!
//! # Example
//!
//! ```no_run
//! use strictly_qwixx::{ComputerPlayer, GameRules, GameRunner, Player};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let players: Vec<Box<dyn Player>> = vec![
//!     Box::new(ComputerPlayer::new("alice")),
//!     Box::new(ComputerPlayer::new("bob")),
//! ];
//! let summary = GameRunner::new(players, GameRules::default(), Some(7)).run().await?;
//! println!("{:?}", summary.outcome());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod game_config;
mod games;
mod orchestrator;
mod players;

// Crate-level exports - Configuration
pub use game_config::{ConfigError, GameConfig, GameRules, PlayerKind, PlayerSpec};

// Crate-level exports - Qwixx types
pub use games::qwixx::{
    ActivePlayerTurn, AppliedTurn, Board, CELLS_PER_ROW, CROSSINGS_BEFORE_LOCK, Crossing,
    DiceRoll, DiceSums, InactivePlayerTurn, MAX_CELL_NUMBER, MIN_CELL_NUMBER, Move, Orientation,
    RIGHTMOST_INDEX, Row, RowColor, RowError, SCORE_TABLE, TurnError, TurnOutcome, Validated,
    invariants, possible_color_moves, possible_white_moves, roll_dice, rules,
};

// Crate-level exports - Orchestration
pub use orchestrator::{
    EndReason, GameEvent, GameRunner, GameState, GameSummary, Outcome, PlayerResult,
};

// Crate-level exports - Players
pub use players::{
    BadActorPlayer, ComputerPlayer, HumanPlayer, Notification, NotificationLog, ParseTurnError,
    Player, PlayerId, ScriptedPlayer, parse_active_turn, parse_inactive_turn,
};
