//! Per-puzzle completion records.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PuzzleOutcome;
use crate::events::PuzzleFinished;

/// Records keyed by puzzle id.
pub type PuzzleRecords = BTreeMap<String, PuzzleRecord>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRecord {
    pub puzzle_id: String,
    pub is_completed: bool,
    /// Best total among successful attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_score: Option<u32>,
    pub attempts: u32,
    /// Time of the first successful attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PuzzleRecord {
    #[must_use]
    pub fn new(puzzle_id: &str) -> Self {
        Self {
            puzzle_id: puzzle_id.to_string(),
            is_completed: false,
            best_score: None,
            attempts: 0,
            completed_at: None,
        }
    }

    /// Count one finished attempt. Completion never reverts.
    pub fn record(&mut self, score: u32, success: bool, at: DateTime<Utc>) {
        self.attempts += 1;
        if success {
            self.best_score = Some(self.best_score.map_or(score, |best| best.max(score)));
            if !self.is_completed {
                self.is_completed = true;
                self.completed_at = Some(at);
            }
        }
    }
}

/// Fold a finished attempt into `records` and describe it for the stats and
/// achievement layers.
///
/// An attempt is perfect when it succeeds on the first try with every
/// required category above zero.
pub fn record_outcome(records: &mut PuzzleRecords, outcome: &PuzzleOutcome, at: DateTime<Utc>) -> PuzzleFinished {
    let record = records
        .entry(outcome.puzzle_id.clone())
        .or_insert_with(|| PuzzleRecord::new(&outcome.puzzle_id));
    record.record(outcome.score, outcome.success, at);
    PuzzleFinished {
        puzzle_id: outcome.puzzle_id.clone(),
        mode: outcome.mode,
        success: outcome.success,
        attempts: record.attempts,
        score: outcome.score,
        perfect: outcome.success && record.attempts == 1 && outcome.all_positive,
        finished_at: at,
    }
}
