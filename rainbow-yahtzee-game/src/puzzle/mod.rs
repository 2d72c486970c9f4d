//! Scripted puzzle challenges: definitions, objective evaluation, attempts
//! and per-puzzle records.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::{Category, GameMode};
use crate::constants::DICE_PER_HAND;
use crate::dice::{DiceColor, Hand};

pub mod attempt;
pub mod catalog;
pub mod objective;
pub mod record;

pub use attempt::{PuzzleAttempt, PuzzleError, PuzzleOutcome};
pub use catalog::{PuzzleCatalog, catalog, validate_puzzle};
pub use objective::{FailReason, ObjectiveStatus};
pub use record::{PuzzleRecord, PuzzleRecords, record_outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }

    /// Sort rank, easiest first.
    #[must_use]
    pub const fn order(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
            Self::Expert => 4,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Every required category scored above zero.
    SpecificCategory,
    MultipleCategories,
    ColorObjective,
    /// The first required category reaches the value.
    CategoryMinimum,
    /// Sum of required categories reaches the value.
    ScoreAtLeast,
    /// Sum of required categories hits the value exactly.
    ScoreExactly,
}

impl ObjectiveKind {
    /// Objectives whose value is a number rather than category ids.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::CategoryMinimum | Self::ScoreAtLeast | Self::ScoreExactly
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectiveValue {
    Score(u32),
    Category(Category),
    Categories(Vec<Category>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(rename = "type")]
    pub kind: ObjectiveKind,
    pub value: ObjectiveValue,
    #[serde(default)]
    pub description: String,
}

impl Objective {
    /// Numeric target of score-based objectives.
    #[must_use]
    pub const fn target(&self) -> Option<u32> {
        match self.value {
            ObjectiveValue::Score(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConstraints {
    #[serde(default)]
    pub required_categories: Option<Vec<Category>>,
    #[serde(default)]
    pub locked_dice_indices: Vec<usize>,
    #[serde(default)]
    pub forbidden_categories: Vec<Category>,
}

/// Immutable puzzle definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub game_mode: GameMode,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Five preset faces, or empty for a blank start.
    #[serde(default)]
    pub initial_dice: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_colors: Option<Vec<DiceColor>>,
    #[serde(default)]
    pub constraints: PuzzleConstraints,
    pub objective: Objective,
}

impl Puzzle {
    /// Categories that must be filled; defaults to the objective's categories.
    #[must_use]
    pub fn required_categories(&self) -> Vec<Category> {
        if let Some(required) = &self.constraints.required_categories {
            return required.clone();
        }
        match &self.objective.value {
            ObjectiveValue::Category(category) => vec![*category],
            ObjectiveValue::Categories(categories) => categories.clone(),
            ObjectiveValue::Score(_) => Vec::new(),
        }
    }

    #[must_use]
    pub fn is_multi_category(&self) -> bool {
        self.required_categories().len() > 1
    }

    /// Opening hand for the first turn when the puzzle presets one.
    #[must_use]
    pub fn preset_hand(&self) -> Option<Hand> {
        let dice: [u8; DICE_PER_HAND] = self.initial_dice.as_slice().try_into().ok()?;
        if dice.iter().all(|&face| face == 0) {
            return None;
        }
        let colors = match (&self.initial_colors, self.game_mode) {
            (Some(colors), GameMode::Rainbow) => colors
                .as_slice()
                .try_into()
                .unwrap_or([DiceColor::Neutral; DICE_PER_HAND]),
            _ => [DiceColor::Neutral; DICE_PER_HAND],
        };
        Some(Hand::rainbow(dice, colors))
    }

    #[must_use]
    pub fn is_forbidden(&self, category: Category) -> bool {
        self.constraints.forbidden_categories.contains(&category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objective_values_parse_untagged() {
        let numeric: Objective =
            serde_json::from_str(r#"{"type":"score_at_least","value":45,"description":""}"#).unwrap();
        assert_eq!(numeric.target(), Some(45));
        let single: Objective =
            serde_json::from_str(r#"{"type":"specific_category","value":"fullHouse"}"#).unwrap();
        assert_eq!(single.value, ObjectiveValue::Category(Category::FullHouse));
        let many: Objective = serde_json::from_str(
            r#"{"type":"multiple_categories","value":["allRed","allBlue"]}"#,
        )
        .unwrap();
        assert!(matches!(many.value, ObjectiveValue::Categories(ref v) if v.len() == 2));
    }

    #[test]
    fn required_defaults_to_objective_value() {
        let puzzle: Puzzle = serde_json::from_str(
            r#"{"id":"p","title":"P","gameMode":"classic","difficulty":"easy",
                "objective":{"type":"specific_category","value":"chance"}}"#,
        )
        .unwrap();
        assert_eq!(puzzle.required_categories(), vec![Category::Chance]);
        assert!(puzzle.preset_hand().is_none());
        assert!(!puzzle.is_multi_category());
    }

    #[test]
    fn preset_hand_respects_mode() {
        let puzzle = catalog().get("rainbow-easy-1").unwrap();
        let hand = puzzle.preset_hand().unwrap();
        assert_eq!(hand.dice, [3, 5, 2, 4, 1]);
        assert_eq!(hand.colors[3], DiceColor::Blue);
        assert_eq!(Difficulty::Hard.order(), 3);
    }
}
