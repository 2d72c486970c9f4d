//! One player's roll, hold and score cycle, including the joker rule.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::{Category, GameMode};
use crate::constants::{DICE_PER_HAND, MAX_ROLLS_PER_TURN, YAHTZEE_SCORE};
use crate::dice::{Hand, roll_color, roll_face};
use crate::scorecard::{Scorecard, ScorecardError};
use crate::scoring::score_category;

/// Rejected turn operations. A rejection never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("no rolls left this turn")]
    NoRollsLeft,
    #[error("dice have not been rolled this turn")]
    NotRolled,
    #[error("dice were already rolled this turn")]
    AlreadyRolled,
    #[error("die {0} does not exist")]
    DieOutOfRange(usize),
    #[error("die {0} is locked")]
    DieLocked(usize),
    #[error("the preset roll cannot be held")]
    PresetRoll,
    #[error("category {0} is already filled")]
    CategoryFilled(Category),
    #[error("category {0} is not on this scorecard")]
    ForeignCategory(Category),
    #[error("five of a kind must be scored as Yahtzee first")]
    MustScoreYahtzeeFirst,
    #[error("the game is already over")]
    GameOver,
}

impl TurnError {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NoRollsLeft => "no_rolls_left",
            Self::NotRolled => "not_rolled",
            Self::AlreadyRolled => "already_rolled",
            Self::DieOutOfRange(_) => "die_out_of_range",
            Self::DieLocked(_) => "die_locked",
            Self::PresetRoll => "preset_roll",
            Self::CategoryFilled(_) => "category_filled",
            Self::ForeignCategory(_) => "foreign_category",
            Self::MustScoreYahtzeeFirst => "must_score_yahtzee_first",
            Self::GameOver => "game_over",
        }
    }
}

impl From<ScorecardError> for TurnError {
    fn from(err: ScorecardError) -> Self {
        match err {
            ScorecardError::AlreadyFilled(category) => Self::CategoryFilled(category),
            ScorecardError::ForeignCategory { category, .. } => Self::ForeignCategory(category),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingRoll,
    Rolling,
    AwaitingSelection,
}

/// How the joker rule resolved an accepted selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Ruling {
    #[default]
    Standard,
    /// Five of a kind over a 50-point Yahtzee: bonus counter +1, no box filled.
    BonusYahtzee,
    /// Five of a kind over a zeroed Yahtzee: scored normally, bonuses forfeited.
    ZeroedYahtzeeLockout,
}

/// Result of an accepted score selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub category: Category,
    /// Points written to the card; `None` when the joker bonus filled nothing.
    pub score: Option<u16>,
    pub ruling: Ruling,
}

/// Dice state for a single turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    mode: GameMode,
    hand: Hand,
    held: [bool; DICE_PER_HAND],
    locked: [bool; DICE_PER_HAND],
    rolls_left: u8,
    has_rolled: bool,
    preset: bool,
}

impl TurnState {
    /// Fresh turn: unrolled dice, nothing held, three rolls.
    #[must_use]
    pub const fn new(mode: GameMode) -> Self {
        Self {
            mode,
            hand: Hand::blank(),
            held: [false; DICE_PER_HAND],
            locked: [false; DICE_PER_HAND],
            rolls_left: MAX_ROLLS_PER_TURN,
            has_rolled: false,
            preset: false,
        }
    }

    /// Blank turn whose `locked` dice start held and stay put once rolled.
    #[must_use]
    pub fn with_locked(mode: GameMode, locked: &[usize]) -> Self {
        let mut turn = Self::new(mode);
        for &index in locked {
            if index < DICE_PER_HAND {
                turn.locked[index] = true;
                turn.held[index] = true;
            }
        }
        turn
    }

    /// Turn that opens on a preset hand which counts as the first roll.
    #[must_use]
    pub fn preset(mode: GameMode, hand: Hand, locked: &[usize]) -> Self {
        let mut turn = Self::with_locked(mode, locked);
        turn.hand = if mode.is_rainbow() {
            hand
        } else {
            Hand::classic(hand.dice)
        };
        turn.rolls_left = MAX_ROLLS_PER_TURN - 1;
        turn.has_rolled = true;
        turn.preset = true;
        turn
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn hand(&self) -> &Hand {
        &self.hand
    }

    #[must_use]
    pub const fn held(&self) -> [bool; DICE_PER_HAND] {
        self.held
    }

    #[must_use]
    pub const fn locked(&self) -> [bool; DICE_PER_HAND] {
        self.locked
    }

    #[must_use]
    pub const fn rolls_left(&self) -> u8 {
        self.rolls_left
    }

    #[must_use]
    pub const fn has_rolled(&self) -> bool {
        self.has_rolled
    }

    /// True while the untouched preset hand is showing.
    #[must_use]
    pub const fn is_preset_showing(&self) -> bool {
        self.preset
    }

    /// Last roll of the turn is on the table.
    #[must_use]
    pub const fn is_final_roll(&self) -> bool {
        self.has_rolled && self.rolls_left == 0
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        if !self.has_rolled {
            TurnPhase::AwaitingRoll
        } else if self.rolls_left > 0 {
            TurnPhase::Rolling
        } else {
            TurnPhase::AwaitingSelection
        }
    }

    /// Reroll every die that is neither held nor locked.
    ///
    /// Held or locked dice that have never been rolled still receive a face.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::NoRollsLeft`] once all rolls are spent.
    pub fn roll<R>(&mut self, rng: &mut R) -> Result<Hand, TurnError>
    where
        R: Rng + ?Sized,
    {
        if self.rolls_left == 0 {
            return Err(TurnError::NoRollsLeft);
        }
        for index in 0..DICE_PER_HAND {
            let kept = self.held[index] || self.locked[index];
            if kept && self.hand.dice[index] != 0 {
                continue;
            }
            self.hand.dice[index] = roll_face(rng);
            if self.mode.is_rainbow() {
                self.hand.colors[index] = roll_color(rng);
            }
        }
        self.rolls_left -= 1;
        self.has_rolled = true;
        self.preset = false;
        debug!(
            "rolled {:?} {:?} ({} rolls left)",
            self.hand.dice, self.hand.colors, self.rolls_left
        );
        Ok(self.hand)
    }

    /// Flip the hold flag of one die. Consumes no roll.
    ///
    /// # Errors
    ///
    /// Rejected before the first roll, while a preset hand is showing, for a
    /// locked die, or for an index outside the hand.
    pub fn toggle_hold(&mut self, index: usize) -> Result<bool, TurnError> {
        if index >= DICE_PER_HAND {
            return Err(TurnError::DieOutOfRange(index));
        }
        if self.locked[index] {
            return Err(TurnError::DieLocked(index));
        }
        if !self.has_rolled {
            return Err(TurnError::NotRolled);
        }
        if self.preset {
            return Err(TurnError::PresetRoll);
        }
        self.held[index] = !self.held[index];
        Ok(self.held[index])
    }

    #[cfg(test)]
    pub(crate) fn force_hand(&mut self, hand: Hand, rolls_left: u8) {
        self.hand = hand;
        self.rolls_left = rolls_left;
        self.has_rolled = true;
        self.preset = false;
    }

    /// Points the current hand would earn in `category`.
    #[must_use]
    pub fn potential(&self, category: Category) -> u16 {
        score_category(category, &self.hand)
    }

    /// Apply a score selection to `card` following the joker rule.
    ///
    /// On five of a kind the Yahtzee box decides the outcome, in order: a
    /// zeroed box locks out bonuses and the selection scores normally; a
    /// 50-point box turns any other selection into a bonus Yahtzee; an open
    /// box forces the Yahtzee selection.
    ///
    /// # Errors
    ///
    /// Rejected before rolling, for filled or foreign categories, and when a
    /// five of a kind must go to the open Yahtzee box. The card is untouched
    /// on rejection.
    pub fn select(&self, card: &mut Scorecard, category: Category) -> Result<Selection, TurnError> {
        if !self.has_rolled {
            return Err(TurnError::NotRolled);
        }
        if !card.contains(category) {
            return Err(TurnError::ForeignCategory(category));
        }
        if card.is_filled(category) {
            return Err(TurnError::CategoryFilled(category));
        }

        let mut ruling = Ruling::Standard;
        if self.hand.is_five_of_a_kind() {
            match card.get(Category::Yahtzee) {
                Some(0) => ruling = Ruling::ZeroedYahtzeeLockout,
                Some(YAHTZEE_SCORE) if category != Category::Yahtzee => {
                    card.award_bonus_yahtzee();
                    debug!("bonus yahtzee awarded ({} total)", card.bonus_yahtzees());
                    return Ok(Selection {
                        category,
                        score: None,
                        ruling: Ruling::BonusYahtzee,
                    });
                }
                None if category != Category::Yahtzee => {
                    return Err(TurnError::MustScoreYahtzeeFirst);
                }
                _ => {}
            }
        }

        let score = self.potential(category);
        card.fill(category, score)?;
        debug!("scored {score} in {category} ({ruling:?})");
        Ok(Selection {
            category,
            score: Some(score),
            ruling,
        })
    }
}
