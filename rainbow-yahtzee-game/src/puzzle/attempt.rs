//! A single playthrough of a puzzle.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::Puzzle;
use super::objective::{self, FailReason, ObjectiveStatus};
use crate::category::{Category, GameMode};
use crate::dice::Hand;
use crate::turn::{TurnError, TurnState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error("category {0} is not part of this puzzle")]
    NotRequired(Category),
    #[error("category {0} is forbidden in this puzzle")]
    Forbidden(Category),
    #[error("category {0} was already scored")]
    AlreadyCompleted(Category),
    #[error("the attempt is over")]
    AttemptOver,
}

impl PuzzleError {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Turn(err) => err.code(),
            Self::NotRequired(_) => "not_required",
            Self::Forbidden(_) => "forbidden",
            Self::AlreadyCompleted(_) => "already_completed",
            Self::AttemptOver => "attempt_over",
        }
    }
}

/// Summary of a finished attempt, handed to the progression layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleOutcome {
    pub puzzle_id: String,
    pub mode: GameMode,
    pub success: bool,
    /// Sum of the scored required categories.
    pub score: u32,
    /// Every required category scored above zero.
    pub all_positive: bool,
    pub fail_reason: Option<FailReason>,
}

/// Turn-by-turn play of one puzzle.
///
/// Each turn fills one required category. The joker rule does not apply;
/// every selection scores its plain category value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleAttempt<'p> {
    puzzle: &'p Puzzle,
    required: Vec<Category>,
    completed: BTreeMap<Category, u16>,
    turn_number: u32,
    turn: TurnState,
    status: ObjectiveStatus,
}

impl<'p> PuzzleAttempt<'p> {
    #[must_use]
    pub fn new(puzzle: &'p Puzzle) -> Self {
        let locked = &puzzle.constraints.locked_dice_indices;
        let turn = puzzle.preset_hand().map_or_else(
            || TurnState::with_locked(puzzle.game_mode, locked),
            |hand| TurnState::preset(puzzle.game_mode, hand, locked),
        );
        Self {
            puzzle,
            required: puzzle.required_categories(),
            completed: BTreeMap::new(),
            turn_number: 1,
            turn,
            status: ObjectiveStatus::InProgress,
        }
    }

    #[must_use]
    pub const fn puzzle(&self) -> &'p Puzzle {
        self.puzzle
    }

    #[must_use]
    pub fn required(&self) -> &[Category] {
        &self.required
    }

    #[must_use]
    pub const fn completed(&self) -> &BTreeMap<Category, u16> {
        &self.completed
    }

    #[must_use]
    pub const fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// One-based turn counter.
    #[must_use]
    pub const fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub const fn status(&self) -> ObjectiveStatus {
        self.status
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.status.is_over()
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.completed.values().copied().map(u32::from).sum()
    }

    /// Required categories not yet scored.
    #[must_use]
    pub fn open_categories(&self) -> Vec<Category> {
        self.required
            .iter()
            .copied()
            .filter(|c| !self.completed.contains_key(c))
            .collect()
    }

    /// Potential scores of the current hand in the open required categories.
    #[must_use]
    pub fn potentials(&self) -> Vec<(Category, u16)> {
        self.open_categories()
            .into_iter()
            .map(|c| (c, self.turn.potential(c)))
            .collect()
    }

    const fn ensure_running(&self) -> Result<(), PuzzleError> {
        if self.status.is_over() {
            Err(PuzzleError::AttemptOver)
        } else {
            Ok(())
        }
    }

    /// Roll the unheld dice. After the last roll of a turn the attempt is
    /// lost when no open category can still satisfy the objective.
    ///
    /// # Errors
    ///
    /// Rejected once the attempt is over or the turn has no rolls left.
    pub fn roll<R>(&mut self, rng: &mut R) -> Result<Hand, PuzzleError>
    where
        R: Rng + ?Sized,
    {
        self.ensure_running()?;
        let hand = self.turn.roll(rng)?;
        self.check_outs();
        Ok(hand)
    }

    fn check_outs(&mut self) {
        if !self.turn.is_final_roll() {
            return;
        }
        let turn = &self.turn;
        let alive = objective::has_outs(
            &self.puzzle.objective,
            &self.required,
            &self.completed,
            |c| turn.potential(c),
        );
        if !alive {
            debug!("{}: no outs on final roll {:?}", self.puzzle.id, turn.hand().dice);
            self.status = ObjectiveStatus::Failed(FailReason::NoOuts);
        }
    }

    /// # Errors
    ///
    /// Rejected once the attempt is over, or for any reason
    /// [`TurnState::toggle_hold`] rejects.
    pub fn toggle_hold(&mut self, index: usize) -> Result<bool, PuzzleError> {
        self.ensure_running()?;
        Ok(self.turn.toggle_hold(index)?)
    }

    /// Score the current hand in `category` and re-evaluate the objective.
    ///
    /// While the attempt stays in progress a fresh turn begins.
    ///
    /// # Errors
    ///
    /// Rejected once the attempt is over, before the first roll, and for
    /// categories that are forbidden, not required or already scored.
    pub fn select(&mut self, category: Category) -> Result<ObjectiveStatus, PuzzleError> {
        self.ensure_running()?;
        if self.puzzle.is_forbidden(category) {
            return Err(PuzzleError::Forbidden(category));
        }
        if !self.required.contains(&category) {
            return Err(PuzzleError::NotRequired(category));
        }
        if self.completed.contains_key(&category) {
            return Err(PuzzleError::AlreadyCompleted(category));
        }
        if !self.turn.has_rolled() {
            return Err(TurnError::NotRolled.into());
        }

        let score = self.turn.potential(category);
        self.completed.insert(category, score);
        self.status = objective::after_selection(&self.puzzle.objective, &self.required, &self.completed, score);
        debug!(
            "{}: scored {score} in {category}, status {:?}",
            self.puzzle.id, self.status
        );
        if !self.status.is_over() {
            self.turn_number += 1;
            self.turn = TurnState::with_locked(self.puzzle.game_mode, &self.puzzle.constraints.locked_dice_indices);
        }
        Ok(self.status)
    }

    /// Start over from the puzzle's opening state.
    pub fn retry(&mut self) {
        *self = Self::new(self.puzzle);
    }

    /// Outcome of a finished attempt; `None` while it is still running.
    #[must_use]
    pub fn outcome(&self) -> Option<PuzzleOutcome> {
        let fail_reason = match self.status {
            ObjectiveStatus::InProgress => return None,
            ObjectiveStatus::Solved => None,
            ObjectiveStatus::Failed(reason) => Some(reason),
        };
        Some(PuzzleOutcome {
            puzzle_id: self.puzzle.id.clone(),
            mode: self.puzzle.game_mode,
            success: fail_reason.is_none(),
            score: self.total_score(),
            all_positive: self
                .required
                .iter()
                .all(|c| self.completed.get(c).is_some_and(|&s| s > 0)),
            fail_reason,
        })
    }
}
