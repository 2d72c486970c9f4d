//! Dice faces, dice colors and the five-die hand shared by both rulesets.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DICE_PER_HAND, MAX_FACE, MIN_FACE};

/// Color painted on a die in the Rainbow ruleset.
///
/// `Neutral` is the sentinel used by the Classic ruleset and by dice that
/// have not been rolled yet; it never counts toward a color category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiceColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    #[default]
    Neutral,
}

impl DiceColor {
    /// The five colors a Rainbow die can land on, in roll order.
    pub const PALETTE: [Self; 5] = [Self::Red, Self::Blue, Self::Green, Self::Yellow, Self::Purple];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Neutral => "neutral",
        }
    }

    #[must_use]
    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }
}

impl fmt::Display for DiceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiceColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "purple" => Ok(Self::Purple),
            "neutral" => Ok(Self::Neutral),
            _ => Err(()),
        }
    }
}

/// Face values of a five-die hand. `0` marks a die that has not been rolled.
pub type Dice = [u8; DICE_PER_HAND];

/// Colors of a five-die hand, index-aligned with [`Dice`].
pub type Colors = [DiceColor; DICE_PER_HAND];

/// A five-die hand: faces plus the parallel color assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Hand {
    pub dice: Dice,
    pub colors: Colors,
}

impl Hand {
    /// Unrolled hand: every face `0`, every color neutral.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            dice: [0; DICE_PER_HAND],
            colors: [DiceColor::Neutral; DICE_PER_HAND],
        }
    }

    /// Hand with neutral colors, as used by the Classic ruleset.
    #[must_use]
    pub const fn classic(dice: Dice) -> Self {
        Self {
            dice,
            colors: [DiceColor::Neutral; DICE_PER_HAND],
        }
    }

    #[must_use]
    pub const fn rainbow(dice: Dice, colors: Colors) -> Self {
        Self { dice, colors }
    }

    /// True once every die shows a legal face.
    #[must_use]
    pub fn is_rolled(&self) -> bool {
        self.dice.iter().all(|&face| (MIN_FACE..=MAX_FACE).contains(&face))
    }

    /// Five rolled dice showing the same face.
    #[must_use]
    pub fn is_five_of_a_kind(&self) -> bool {
        self.is_rolled() && self.dice.iter().all(|&face| face == self.dice[0])
    }

    #[must_use]
    pub fn sum(&self) -> u16 {
        self.dice.iter().map(|&face| u16::from(face)).sum()
    }
}

/// Draw a uniformly distributed face in `1..=6`.
pub fn roll_face<R>(rng: &mut R) -> u8
where
    R: Rng + ?Sized,
{
    rng.gen_range(MIN_FACE..=MAX_FACE)
}

/// Draw a uniformly distributed color from the five-color palette.
pub fn roll_color<R>(rng: &mut R) -> DiceColor
where
    R: Rng + ?Sized,
{
    DiceColor::PALETTE[rng.gen_range(0..DiceColor::PALETTE.len())]
}
