//! Events emitted when a game or puzzle attempt finishes, plus the score
//! history record persisted for each finished game.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::GameMode;
use crate::scorecard::Scorecard;

/// A player's completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFinished {
    pub mode: GameMode,
    pub player_name: String,
    pub scorecard: Scorecard,
    /// Grand total of `scorecard`.
    pub score: u32,
    pub finished_at: DateTime<Utc>,
}

impl GameFinished {
    #[must_use]
    pub fn new(player_name: impl Into<String>, scorecard: Scorecard, finished_at: DateTime<Utc>) -> Self {
        Self {
            mode: scorecard.mode(),
            player_name: player_name.into(),
            score: scorecard.grand_total(),
            scorecard,
            finished_at,
        }
    }
}

/// A finished puzzle attempt as seen by the progression layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleFinished {
    pub puzzle_id: String,
    pub mode: GameMode,
    pub success: bool,
    /// Attempts made on this puzzle so far, this one included.
    pub attempts: u32,
    pub score: u32,
    pub perfect: bool,
    pub finished_at: DateTime<Utc>,
}

/// Entry in the persisted score history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub mode: GameMode,
    pub score: u32,
    pub player_name: String,
    pub date: DateTime<Utc>,
    pub scorecard: Scorecard,
}

impl ScoreRecord {
    /// Same player, ruleset, finish time and score as `game`.
    #[must_use]
    pub fn is_same_game(&self, game: &GameFinished) -> bool {
        self.player_name == game.player_name
            && self.mode == game.mode
            && self.date == game.finished_at
            && self.score == game.score
    }
}

impl From<&GameFinished> for ScoreRecord {
    fn from(event: &GameFinished) -> Self {
        Self {
            mode: event.mode,
            score: event.score,
            player_name: event.player_name.clone(),
            date: event.finished_at,
            scorecard: event.scorecard.clone(),
        }
    }
}
