//! Objective evaluation over the categories an attempt has filled so far.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Objective, ObjectiveKind};
use crate::category::Category;

/// Why an attempt was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    /// A selection scored zero.
    ZeroScore,
    /// The running total passed an exact target.
    Overshoot,
    /// The minimum-score category was filled below the target.
    BelowMinimum,
    /// The final roll leaves no category that keeps the objective alive.
    NoOuts,
    /// Every category is filled but the objective was not met.
    Missed,
}

impl FailReason {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ZeroScore => "zero_score",
            Self::Overshoot => "overshoot",
            Self::BelowMinimum => "below_minimum",
            Self::NoOuts => "no_outs",
            Self::Missed => "missed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum ObjectiveStatus {
    InProgress,
    Solved,
    Failed(FailReason),
}

impl ObjectiveStatus {
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    #[must_use]
    pub const fn is_solved(self) -> bool {
        matches!(self, Self::Solved)
    }
}

fn running_total(completed: &BTreeMap<Category, u16>) -> u32 {
    completed.values().copied().map(u32::from).sum()
}

/// Status once a selection worth `last_score` has been written into `completed`.
#[must_use]
pub fn after_selection(
    objective: &Objective,
    required: &[Category],
    completed: &BTreeMap<Category, u16>,
    last_score: u16,
) -> ObjectiveStatus {
    if last_score == 0 {
        return ObjectiveStatus::Failed(FailReason::ZeroScore);
    }
    let target = objective.target().unwrap_or(0);
    let total = running_total(completed);
    match objective.kind {
        ObjectiveKind::ScoreExactly if total > target => {
            return ObjectiveStatus::Failed(FailReason::Overshoot);
        }
        ObjectiveKind::CategoryMinimum => {
            let first = required.first().and_then(|c| completed.get(c));
            if first.is_some_and(|&score| u32::from(score) < target) {
                return ObjectiveStatus::Failed(FailReason::BelowMinimum);
            }
        }
        _ => {}
    }
    if required.iter().all(|c| completed.contains_key(c)) {
        if is_met(objective, required, completed) {
            ObjectiveStatus::Solved
        } else {
            ObjectiveStatus::Failed(FailReason::Missed)
        }
    } else {
        ObjectiveStatus::InProgress
    }
}

/// Objective check over a fully filled set of required categories.
#[must_use]
pub fn is_met(objective: &Objective, required: &[Category], completed: &BTreeMap<Category, u16>) -> bool {
    let target = objective.target().unwrap_or(0);
    let score_of = |c: &Category| completed.get(c).copied().unwrap_or(0);
    match objective.kind {
        ObjectiveKind::SpecificCategory
        | ObjectiveKind::MultipleCategories
        | ObjectiveKind::ColorObjective => required.iter().all(|c| score_of(c) > 0),
        ObjectiveKind::CategoryMinimum => required
            .first()
            .is_some_and(|c| u32::from(score_of(c)) >= target),
        ObjectiveKind::ScoreAtLeast => running_total(completed) >= target,
        ObjectiveKind::ScoreExactly => running_total(completed) == target,
    }
}

/// Whether some open required category can still keep the attempt alive
/// given the potential scores of the current hand.
///
/// For a minimum-score objective whose target category is still open only
/// that category counts and it must reach the target. An exact target also
/// rules out categories that would overshoot. Otherwise any open category
/// worth more than zero is an out.
pub fn has_outs<F>(
    objective: &Objective,
    required: &[Category],
    completed: &BTreeMap<Category, u16>,
    potential: F,
) -> bool
where
    F: Fn(Category) -> u16,
{
    let target = objective.target().unwrap_or(0);
    let total = running_total(completed);
    let mut open = required.iter().copied().filter(|c| !completed.contains_key(c));
    match objective.kind {
        ObjectiveKind::CategoryMinimum => match required.first() {
            Some(first) if !completed.contains_key(first) => u32::from(potential(*first)) >= target,
            _ => open.any(|c| potential(c) > 0),
        },
        ObjectiveKind::ScoreExactly => open.any(|c| {
            let value = potential(c);
            value > 0 && total + u32::from(value) <= target
        }),
        _ => open.any(|c| potential(c) > 0),
    }
}
