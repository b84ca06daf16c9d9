//! The six Qwixx dice and the sums they allow.

use super::types::{Move, RowColor};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One roll of two white dice and one die per row color, each 1-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_new::new)]
pub struct DiceRoll {
    /// First white die.
    pub white1: u8,
    /// Second white die.
    pub white2: u8,
    /// Red die.
    pub red: u8,
    /// Yellow die.
    pub yellow: u8,
    /// Green die.
    pub green: u8,
    /// Blue die.
    pub blue: u8,
}

impl DiceRoll {
    /// Value of the colored die matching `color`.
    pub fn die(&self, color: RowColor) -> u8 {
        match color {
            RowColor::Red => self.red,
            RowColor::Yellow => self.yellow,
            RowColor::Green => self.green,
            RowColor::Blue => self.blue,
        }
    }

    /// First die showing something other than 1-6, if any.
    pub fn faulty_die(&self) -> Option<u8> {
        [self.white1, self.white2, self.red, self.yellow, self.green, self.blue]
            .into_iter()
            .find(|value| !(1..=6).contains(value))
    }

    /// Sums derived from this roll.
    pub fn sums(&self) -> DiceSums {
        DiceSums::from(*self)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "white {} and {}, red {}, yellow {}, green {}, blue {}",
            self.white1, self.white2, self.red, self.yellow, self.green, self.blue
        )
    }
}

/// Rolls all six dice.
#[instrument(skip(rng))]
pub fn roll_dice<R: Rng>(rng: &mut R) -> DiceRoll {
    let mut die = || rng.random_range(1..=6u8);
    let roll = DiceRoll {
        white1: die(),
        white2: die(),
        red: die(),
        yellow: die(),
        green: die(),
        blue: die(),
    };
    debug!(%roll, "Dice rolled");
    roll
}

/// The nine numbers a roll makes available.
///
/// One white sum (both white dice) and, per color, that die plus either
/// white die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceSums {
    /// Sum of both white dice.
    pub white: u8,
    /// Per color (board order): color die + first white, color die + second white.
    pub color: [(u8, u8); 4],
}

impl DiceSums {
    /// The two candidate sums for `color`.
    pub fn for_color(&self, color: RowColor) -> (u8, u8) {
        self.color[color.board_index()]
    }
}

impl From<DiceRoll> for DiceSums {
    fn from(roll: DiceRoll) -> Self {
        Self {
            white: roll.white1.saturating_add(roll.white2),
            color: RowColor::ALL.map(|c| {
                let die = roll.die(c);
                (roll.white1.saturating_add(die), roll.white2.saturating_add(die))
            }),
        }
    }
}

/// The white sum on each of the four rows.
pub fn possible_white_moves(roll: &DiceRoll) -> [Move; 4] {
    let white = roll.sums().white;
    RowColor::ALL.map(|color| Move::new(color, white))
}

/// Each color's two sums on that color's row, in board order.
pub fn possible_color_moves(roll: &DiceRoll) -> [Move; 8] {
    let sums = roll.sums();
    let mut moves = [Move::new(RowColor::Red, 0); 8];
    for color in RowColor::ALL {
        let (first, second) = sums.for_color(color);
        let slot = color.board_index() * 2;
        moves[slot] = Move::new(color, first);
        moves[slot + 1] = Move::new(color, second);
    }
    moves
}
