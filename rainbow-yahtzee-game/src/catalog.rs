//! Validation errors shared by the embedded data catalogs.
use thiserror::Error;

use crate::category::{Category, GameMode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(String),
    #[error("duplicate id {0}")]
    DuplicateId(String),
    #[error("{id}: progress achievement has no target")]
    MissingTarget { id: String },
    #[error("{id}: achievement lists no modes")]
    NoModes { id: String },
    #[error("{id}: category {category} is not part of {mode}")]
    ForeignCategory {
        id: String,
        category: Category,
        mode: GameMode,
    },
    #[error("{id}: die value {value} is outside 0..=6")]
    InvalidDie { id: String, value: u8 },
    #[error("{id}: preset dice must be all zero or all rolled")]
    PartialPreset { id: String },
    #[error("{id}: Rainbow preset dice need a palette color for every die")]
    MissingPresetColors { id: String },
    #[error("{id}: locked die index {index} is outside the hand")]
    InvalidLockedIndex { id: String, index: usize },
    #[error("{id}: no required categories")]
    NoRequiredCategories { id: String },
    #[error("{id}: required category {category} is also forbidden")]
    ForbiddenRequired { id: String, category: Category },
    #[error("{id}: objective value does not fit objective type")]
    ObjectiveMismatch { id: String },
    #[error("{id}: objective target {target} is unreachable (max {max})")]
    UnreachableTarget { id: String, target: u32, max: u32 },
}

impl CatalogError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::DuplicateId(_) => "duplicate_id",
            Self::MissingTarget { .. } => "missing_target",
            Self::NoModes { .. } => "no_modes",
            Self::ForeignCategory { .. } => "foreign_category",
            Self::InvalidDie { .. } => "invalid_die",
            Self::PartialPreset { .. } => "partial_preset",
            Self::MissingPresetColors { .. } => "missing_preset_colors",
            Self::InvalidLockedIndex { .. } => "invalid_locked_index",
            Self::NoRequiredCategories { .. } => "no_required_categories",
            Self::ForbiddenRequired { .. } => "forbidden_required",
            Self::ObjectiveMismatch { .. } => "objective_mismatch",
            Self::UnreachableTarget { .. } => "unreachable_target",
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
