//! Data-driven achievements: definitions, the stored ledger and the
//! evaluator that updates it after each finished game or puzzle.
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use crate::catalog::CatalogError;
use crate::category::GameMode;

pub mod condition;
pub mod engine;

pub use condition::{Condition, ConditionValue, EvaluationContext, PuzzleContext};
pub use engine::{evaluate_game, evaluate_puzzle};

const DEFAULT_ACHIEVEMENT_DATA: &str = include_str!("../../data/achievements.json");

/// Grouping used for event filtering and the mode-mastery count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Classic,
    Rainbow,
    Dual,
    Puzzle,
}

impl AchievementCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Rainbow => "rainbow",
            Self::Dual => "dual",
            Self::Puzzle => "puzzle",
        }
    }
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: AchievementCategory,
    pub modes: Vec<GameMode>,
    #[serde(default)]
    pub icon: String,
    /// Threshold for progress conditions.
    #[serde(default)]
    pub target: Option<u64>,
    pub condition: Condition,
}

impl AchievementDef {
    #[must_use]
    pub fn applies_to(&self, mode: GameMode) -> bool {
        self.modes.contains(&mode)
    }

    #[must_use]
    pub const fn is_progress(&self) -> bool {
        matches!(
            self.condition,
            Condition::Stat { .. } | Condition::StatSum { .. } | Condition::CategoryUnlocks { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AchievementCatalog {
    #[serde(default)]
    pub achievements: Vec<AchievementDef>,
}

impl AchievementCatalog {
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_ACHIEVEMENT_DATA).unwrap_or_else(|err| {
            warn!("embedded achievement catalog rejected: {err}");
            Self::default()
        })
    }

    /// Parse and validate a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or a catalog that fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Ids are unique, every entry names a mode and progress entries carry a target.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for def in &self.achievements {
            if !seen.insert(def.id.as_str()) {
                return Err(CatalogError::DuplicateId(def.id.clone()));
            }
            if def.modes.is_empty() {
                return Err(CatalogError::NoModes { id: def.id.clone() });
            }
            if def.is_progress() && def.target.is_none() {
                return Err(CatalogError::MissingTarget { id: def.id.clone() });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AchievementDef> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Every achievement paired with its stored progress, locked when absent.
    #[must_use]
    pub fn with_progress(&self, ledger: &AchievementLedger) -> Vec<AchievementStatus<'_>> {
        self.achievements
            .iter()
            .map(|def| AchievementStatus {
                def,
                progress: ledger
                    .get(&def.id)
                    .cloned()
                    .unwrap_or_else(|| AchievementProgress::locked(&def.id)),
            })
            .collect()
    }
}

/// Shared embedded catalog.
#[must_use]
pub fn catalog() -> &'static AchievementCatalog {
    static CATALOG: OnceLock<AchievementCatalog> = OnceLock::new();
    CATALOG.get_or_init(AchievementCatalog::load_from_static)
}

/// Stored state of one achievement. `unlocked` never reverts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub id: String,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub progress: u64,
}

impl AchievementProgress {
    #[must_use]
    pub fn locked(id: &str) -> Self {
        Self {
            id: id.to_string(),
            unlocked: false,
            unlocked_at: None,
            progress: 0,
        }
    }
}

/// An achievement together with the player's progress on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementStatus<'a> {
    pub def: &'a AchievementDef,
    pub progress: AchievementProgress,
}

/// Per-profile achievement progress keyed by achievement id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AchievementLedger {
    entries: BTreeMap<String, AchievementProgress>,
}

impl AchievementLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AchievementProgress> {
        self.entries.get(id)
    }

    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.entries.get(id).is_some_and(|p| p.unlocked)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AchievementProgress> {
        self.entries.values()
    }

    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.entries.values().filter(|p| p.unlocked).count()
    }

    fn entry(&mut self, id: &str) -> &mut AchievementProgress {
        self.entries
            .entry(id.to_string())
            .or_insert_with(|| AchievementProgress::locked(id))
    }

    /// Overwrite the tracked absolute progress value.
    pub fn set_progress(&mut self, id: &str, progress: u64) {
        self.entry(id).progress = progress;
    }

    /// Mark unlocked. Returns `false` when it already was.
    pub fn unlock(&mut self, id: &str, at: DateTime<Utc>) -> bool {
        let entry = self.entry(id);
        if entry.unlocked {
            return false;
        }
        entry.unlocked = true;
        entry.unlocked_at = Some(at);
        true
    }
}
