//! Per-player scorecards and the aggregate totals derived from them.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::category::{Category, GameMode, Section};
use crate::constants::{BONUS_YAHTZEE_SCORE, UPPER_BONUS_SCORE, UPPER_BONUS_THRESHOLD};

/// Reasons a scorecard refuses to record a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScorecardError {
    #[error("category {0} is already filled")]
    AlreadyFilled(Category),
    #[error("category {category} is not part of a {mode} scorecard")]
    ForeignCategory { category: Category, mode: GameMode },
}

/// One player's category scores for one game.
///
/// Every category of the ruleset is present as a key; `None` marks an open
/// box. A filled box never changes again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    mode: GameMode,
    scores: BTreeMap<Category, Option<u16>>,
    #[serde(default)]
    bonus_yahtzees: u16,
}

impl Default for Scorecard {
    fn default() -> Self {
        Self::new(GameMode::Classic)
    }
}

impl Scorecard {
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            scores: mode.categories().iter().map(|&c| (c, None)).collect(),
            bonus_yahtzees: 0,
        }
    }

    /// Build a scorecard from explicit entries; categories left out stay open.
    ///
    /// # Errors
    ///
    /// Returns an error when an entry does not belong to `mode` or appears twice.
    pub fn from_scores<I>(mode: GameMode, entries: I) -> Result<Self, ScorecardError>
    where
        I: IntoIterator<Item = (Category, u16)>,
    {
        let mut card = Self::new(mode);
        for (category, score) in entries {
            card.fill(category, score)?;
        }
        Ok(card)
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub const fn bonus_yahtzees(&self) -> u16 {
        self.bonus_yahtzees
    }

    /// Score recorded in `category`, `None` while open or when foreign to the ruleset.
    #[must_use]
    pub fn get(&self, category: Category) -> Option<u16> {
        self.scores.get(&category).copied().flatten()
    }

    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.scores.contains_key(&category)
    }

    #[must_use]
    pub fn is_filled(&self, category: Category) -> bool {
        self.get(category).is_some()
    }

    /// Record `score` in an open category.
    ///
    /// # Errors
    ///
    /// Returns an error when the category is already filled or not on this card.
    pub fn fill(&mut self, category: Category, score: u16) -> Result<(), ScorecardError> {
        match self.scores.get_mut(&category) {
            None => Err(ScorecardError::ForeignCategory {
                category,
                mode: self.mode,
            }),
            Some(slot) if slot.is_some() => Err(ScorecardError::AlreadyFilled(category)),
            Some(slot) => {
                *slot = Some(score);
                Ok(())
            }
        }
    }

    pub(crate) const fn award_bonus_yahtzee(&mut self) {
        self.bonus_yahtzees = self.bonus_yahtzees.saturating_add(1);
    }

    /// Every category and its current value in card order.
    pub fn entries(&self) -> impl Iterator<Item = (Category, Option<u16>)> + '_ {
        self.scores.iter().map(|(&c, &s)| (c, s))
    }

    pub fn open_categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries()
            .filter_map(|(category, score)| score.is_none().then_some(category))
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.scores.values().filter(|s| s.is_some()).count()
    }

    /// True once every category of the ruleset holds a score.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.scores.values().all(Option::is_some)
    }

    /// Categories filled with a zero.
    #[must_use]
    pub fn zero_count(&self) -> usize {
        self.scores.values().filter(|s| **s == Some(0)).count()
    }

    fn section_sum(&self, section: Section) -> u32 {
        self.scores
            .iter()
            .filter(|(c, _)| c.section() == section)
            .filter_map(|(_, s)| *s)
            .map(u32::from)
            .sum()
    }

    #[must_use]
    pub fn upper_subtotal(&self) -> u32 {
        self.section_sum(Section::Upper)
    }

    #[must_use]
    pub fn upper_bonus(&self) -> u32 {
        if self.upper_subtotal() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS_SCORE
        } else {
            0
        }
    }

    /// Lower section including the bonus Yahtzee payouts.
    #[must_use]
    pub fn lower_subtotal(&self) -> u32 {
        self.section_sum(Section::Lower) + u32::from(self.bonus_yahtzees) * BONUS_YAHTZEE_SCORE
    }

    /// Color section; always zero on a Classic card.
    #[must_use]
    pub fn color_subtotal(&self) -> u32 {
        self.section_sum(Section::Color)
    }

    #[must_use]
    pub fn grand_total(&self) -> u32 {
        self.upper_subtotal() + self.upper_bonus() + self.lower_subtotal() + self.color_subtotal()
    }

    #[must_use]
    pub fn totals(&self) -> ScoreTotals {
        ScoreTotals {
            upper: self.upper_subtotal(),
            upper_bonus: self.upper_bonus(),
            lower: self.lower_subtotal(),
            color: self.color_subtotal(),
            grand: self.grand_total(),
        }
    }
}

/// Snapshot of a scorecard's aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTotals {
    pub upper: u32,
    pub upper_bonus: u32,
    pub lower: u32,
    pub color: u32,
    pub grand: u32,
}
