//! Embedded puzzle catalog and its load-time validation.
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use super::{ObjectiveKind, ObjectiveValue, Puzzle};
use crate::catalog::CatalogError;
use crate::category::GameMode;
use crate::constants::{DICE_PER_HAND, MAX_FACE};
use crate::scoring::max_score;

const DEFAULT_PUZZLE_DATA: &str = include_str!("../../data/puzzles.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PuzzleCatalog {
    #[serde(default)]
    pub puzzles: Vec<Puzzle>,
}

impl PuzzleCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_PUZZLE_DATA).unwrap_or_else(|err| {
            warn!("embedded puzzle catalog rejected: {err}");
            Self::default()
        })
    }

    /// Parse a catalog and validate every puzzle in it.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON, duplicate ids, or the first
    /// puzzle that fails [`validate_puzzle`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        let mut seen = HashSet::new();
        for puzzle in &catalog.puzzles {
            if !seen.insert(puzzle.id.as_str()) {
                return Err(CatalogError::DuplicateId(puzzle.id.clone()));
            }
            validate_puzzle(puzzle)?;
        }
        Ok(catalog)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| p.id == id)
    }

    /// Puzzles for one mode, easiest first, catalog order within a difficulty.
    #[must_use]
    pub fn by_mode(&self, mode: GameMode) -> Vec<&Puzzle> {
        let mut list: Vec<&Puzzle> = self.puzzles.iter().filter(|p| p.game_mode == mode).collect();
        list.sort_by_key(|p| p.difficulty.order());
        list
    }

    /// The puzzle following `id` within its mode's listing.
    #[must_use]
    pub fn next_after(&self, id: &str) -> Option<&Puzzle> {
        let current = self.get(id)?;
        let list = self.by_mode(current.game_mode);
        let position = list.iter().position(|p| p.id == id)?;
        list.get(position + 1).copied()
    }
}

/// Shared embedded catalog.
#[must_use]
pub fn catalog() -> &'static PuzzleCatalog {
    static CATALOG: OnceLock<PuzzleCatalog> = OnceLock::new();
    CATALOG.get_or_init(PuzzleCatalog::load_from_static)
}

/// Check one puzzle definition for internal consistency.
///
/// # Errors
///
/// Returns the first problem found: malformed preset dice or colors, a
/// Rainbow preset without a full palette, a locked
/// index outside the hand, missing or foreign required categories, a required
/// category that is also forbidden, an objective value of the wrong shape, or
/// a numeric target no hand could reach.
pub fn validate_puzzle(puzzle: &Puzzle) -> Result<(), CatalogError> {
    let id = || puzzle.id.clone();

    if !puzzle.initial_dice.is_empty() {
        if puzzle.initial_dice.len() != DICE_PER_HAND {
            return Err(CatalogError::PartialPreset { id: id() });
        }
        if let Some(&value) = puzzle.initial_dice.iter().find(|&&v| v > MAX_FACE) {
            return Err(CatalogError::InvalidDie { id: id(), value });
        }
        let rolled = puzzle.initial_dice.iter().filter(|&&v| v != 0).count();
        if rolled != 0 && rolled != DICE_PER_HAND {
            return Err(CatalogError::PartialPreset { id: id() });
        }
    }
    if puzzle
        .initial_colors
        .as_ref()
        .is_some_and(|colors| colors.len() != DICE_PER_HAND)
    {
        return Err(CatalogError::PartialPreset { id: id() });
    }
    let rolled_preset = puzzle.initial_dice.iter().any(|&v| v != 0);
    if rolled_preset
        && puzzle.game_mode == GameMode::Rainbow
        && !puzzle
            .initial_colors
            .as_ref()
            .is_some_and(|colors| colors.iter().all(|c| !c.is_neutral()))
    {
        return Err(CatalogError::MissingPresetColors { id: id() });
    }
    if let Some(&index) = puzzle
        .constraints
        .locked_dice_indices
        .iter()
        .find(|&&i| i >= DICE_PER_HAND)
    {
        return Err(CatalogError::InvalidLockedIndex { id: id(), index });
    }

    let required = puzzle.required_categories();
    if required.is_empty() {
        return Err(CatalogError::NoRequiredCategories { id: id() });
    }
    for &category in &required {
        if !category.belongs_to(puzzle.game_mode) {
            return Err(CatalogError::ForeignCategory {
                id: id(),
                category,
                mode: puzzle.game_mode,
            });
        }
        if puzzle.is_forbidden(category) {
            return Err(CatalogError::ForbiddenRequired { id: id(), category });
        }
    }

    let objective = &puzzle.objective;
    if matches!(objective.value, ObjectiveValue::Score(_)) != objective.kind.is_numeric() {
        return Err(CatalogError::ObjectiveMismatch { id: id() });
    }

    if let Some(target) = objective.target() {
        let max: u32 = match objective.kind {
            ObjectiveKind::CategoryMinimum => required
                .first()
                .map_or(0, |&c| u32::from(max_score(c))),
            _ => required.iter().map(|&c| u32::from(max_score(c))).sum(),
        };
        if target > max {
            return Err(CatalogError::UnreachableTarget {
                id: id(),
                target,
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::dice::DiceColor;

    fn sample() -> Puzzle {
        serde_json::from_str(
            r#"{"id":"t","title":"T","gameMode":"classic","difficulty":"easy",
                "initialDice":[1,2,3,4,5],
                "constraints":{"requiredCategories":["chance","sixes"]},
                "objective":{"type":"score_at_least","value":40}}"#,
        )
        .unwrap()
    }

    #[test]
    fn embedded_catalog_has_thirty_valid_puzzles() {
        let parsed = PuzzleCatalog::from_json(DEFAULT_PUZZLE_DATA).unwrap();
        assert_eq!(parsed.puzzles.len(), 30);
        assert_eq!(catalog().puzzles.len(), 30);
        assert!(catalog().by_mode(GameMode::Rainbow).iter().all(|p| p.game_mode == GameMode::Rainbow));
    }

    #[test]
    fn listing_is_sorted_by_difficulty() {
        let list = catalog().by_mode(GameMode::Classic);
        assert!(list.windows(2).all(|w| w[0].difficulty.order() <= w[1].difficulty.order()));
        let first = list.first().unwrap();
        let second = catalog().next_after(&first.id).unwrap();
        assert_eq!(second.id, list[1].id);
        assert!(catalog().next_after(&list.last().unwrap().id).is_none());
    }

    #[test]
    fn sample_validates() {
        assert_eq!(validate_puzzle(&sample()), Ok(()));
    }

    #[test]
    fn rejects_partial_preset() {
        let mut puzzle = sample();
        puzzle.initial_dice = vec![1, 0, 3, 4, 5];
        assert_eq!(validate_puzzle(&puzzle).unwrap_err().code(), "partial_preset");
        puzzle.initial_dice = vec![1, 2, 7, 4, 5];
        assert_eq!(
            validate_puzzle(&puzzle),
            Err(CatalogError::InvalidDie {
                id: "t".into(),
                value: 7
            })
        );
    }

    #[test]
    fn rejects_foreign_and_forbidden_categories() {
        let mut puzzle = sample();
        puzzle.constraints.required_categories = Some(vec![Category::AllRed]);
        assert_eq!(validate_puzzle(&puzzle).unwrap_err().code(), "foreign_category");
        puzzle.constraints.required_categories = Some(vec![Category::Chance]);
        puzzle.constraints.forbidden_categories = vec![Category::Chance];
        assert_eq!(validate_puzzle(&puzzle).unwrap_err().code(), "forbidden_required");
    }

    #[test]
    fn rejects_unreachable_target_and_bad_shape() {
        let mut puzzle = sample();
        puzzle.objective.value = ObjectiveValue::Score(61);
        assert_eq!(
            validate_puzzle(&puzzle),
            Err(CatalogError::UnreachableTarget {
                id: "t".into(),
                target: 61,
                max: 60
            })
        );
        puzzle.objective.value = ObjectiveValue::Category(Category::Chance);
        assert_eq!(validate_puzzle(&puzzle).unwrap_err().code(), "objective_mismatch");
    }

    #[test]
    fn rainbow_preset_needs_palette_colors() {
        let mut puzzle = sample();
        puzzle.game_mode = GameMode::Rainbow;
        puzzle.constraints.required_categories = Some(vec![Category::ThreeColorMix]);
        puzzle.objective.value = ObjectiveValue::Score(20);
        assert_eq!(
            validate_puzzle(&puzzle),
            Err(CatalogError::MissingPresetColors { id: "t".into() })
        );

        let mut colors = vec![
            DiceColor::Red,
            DiceColor::Blue,
            DiceColor::Green,
            DiceColor::Red,
            DiceColor::Neutral,
        ];
        puzzle.initial_colors = Some(colors.clone());
        assert_eq!(validate_puzzle(&puzzle).unwrap_err().code(), "missing_preset_colors");

        colors[4] = DiceColor::Blue;
        puzzle.initial_colors = Some(colors);
        assert_eq!(validate_puzzle(&puzzle), Ok(()));

        puzzle.initial_dice.clear();
        puzzle.initial_colors = None;
        assert_eq!(validate_puzzle(&puzzle), Ok(()));
    }

    #[test]
    fn rejects_duplicates_and_bad_locks() {
        let mut puzzle = sample();
        puzzle.constraints.locked_dice_indices = vec![5];
        assert_eq!(validate_puzzle(&puzzle).unwrap_err().code(), "invalid_locked_index");
        let json = serde_json::to_string(&PuzzleCatalog {
            puzzles: vec![sample(), sample()],
        })
        .unwrap();
        assert_eq!(
            PuzzleCatalog::from_json(&json),
            Err(CatalogError::DuplicateId("t".into()))
        );
    }
}
