//! Long-lived profile statistics updated once per finished game or puzzle.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{Category, GameMode};
use crate::constants::{
    STAT_CLASSIC_ELITE_SCORE, STAT_FOUR_OF_KIND_ELITE, STAT_FOUR_OF_KIND_HIGH,
    STAT_RAINBOW_ELITE_SCORE, STAT_THREE_OF_KIND_HIGH, YAHTZEE_SCORE,
};
use crate::events::{GameFinished, PuzzleFinished};
use crate::numbers::rounded_average;

/// Cumulative profile statistics.
///
/// Every field defaults so records written by older builds load with the
/// newer tallies at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AllTimeStats {
    pub classic_games_completed: u32,
    pub rainbow_games_completed: u32,
    pub classic_high_scores: Vec<u32>,
    pub rainbow_high_scores: Vec<u32>,
    pub total_yahtzees_in_classic: u32,
    pub total_yahtzees_in_rainbow: u32,
    pub classic_bonus_yahtzees: u32,
    pub rainbow_bonus_yahtzees: u32,
    pub upper_bonuses_earned: u32,
    pub three_of_kind_20_plus: u32,
    pub four_of_kind_25_plus: u32,
    pub four_of_kind_30_plus: u32,
    pub straight_shooter_games: u32,
    pub classic_275_plus_games: u32,
    pub rainbow_400_plus_games: u32,
    pub total_rainbow_points: u64,
    pub both_modes_played: bool,
    pub perfect_games_completed: u32,
    pub streak: u32,
    pub total_games: u32,
    pub best_classic_score: u32,
    pub best_rainbow_score: u32,
    pub classic_average: u32,
    pub rainbow_average: u32,
    pub last_game_date: Option<DateTime<Utc>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub puzzles_played: u32,
    pub puzzles_solved: u32,
    pub classic_puzzles_solved: u32,
    pub rainbow_puzzles_solved: u32,
    pub puzzle_perfects: u32,
}

/// Numeric statistic an achievement can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKey {
    ClassicGamesCompleted,
    RainbowGamesCompleted,
    TotalGames,
    TotalClassicPoints,
    TotalRainbowPoints,
    TotalYahtzeesInClassic,
    TotalYahtzeesInRainbow,
    ClassicBonusYahtzees,
    RainbowBonusYahtzees,
    UpperBonusesEarned,
    ThreeOfKind20Plus,
    FourOfKind25Plus,
    FourOfKind30Plus,
    StraightShooterGames,
    Classic275PlusGames,
    Rainbow400PlusGames,
    PerfectGamesCompleted,
    Streak,
    BestClassicScore,
    BestRainbowScore,
    PuzzlesPlayed,
    PuzzlesSolved,
    ClassicPuzzlesSolved,
    RainbowPuzzlesSolved,
    PuzzlePerfects,
}

impl AllTimeStats {
    /// Sum of every recorded Classic score.
    #[must_use]
    pub fn total_classic_points(&self) -> u64 {
        self.classic_high_scores.iter().copied().map(u64::from).sum()
    }

    #[must_use]
    pub fn stat(&self, key: StatKey) -> u64 {
        match key {
            StatKey::ClassicGamesCompleted => self.classic_games_completed.into(),
            StatKey::RainbowGamesCompleted => self.rainbow_games_completed.into(),
            StatKey::TotalGames => self.total_games.into(),
            StatKey::TotalClassicPoints => self.total_classic_points(),
            StatKey::TotalRainbowPoints => self.total_rainbow_points,
            StatKey::TotalYahtzeesInClassic => self.total_yahtzees_in_classic.into(),
            StatKey::TotalYahtzeesInRainbow => self.total_yahtzees_in_rainbow.into(),
            StatKey::ClassicBonusYahtzees => self.classic_bonus_yahtzees.into(),
            StatKey::RainbowBonusYahtzees => self.rainbow_bonus_yahtzees.into(),
            StatKey::UpperBonusesEarned => self.upper_bonuses_earned.into(),
            StatKey::ThreeOfKind20Plus => self.three_of_kind_20_plus.into(),
            StatKey::FourOfKind25Plus => self.four_of_kind_25_plus.into(),
            StatKey::FourOfKind30Plus => self.four_of_kind_30_plus.into(),
            StatKey::StraightShooterGames => self.straight_shooter_games.into(),
            StatKey::Classic275PlusGames => self.classic_275_plus_games.into(),
            StatKey::Rainbow400PlusGames => self.rainbow_400_plus_games.into(),
            StatKey::PerfectGamesCompleted => self.perfect_games_completed.into(),
            StatKey::Streak => self.streak.into(),
            StatKey::BestClassicScore => self.best_classic_score.into(),
            StatKey::BestRainbowScore => self.best_rainbow_score.into(),
            StatKey::PuzzlesPlayed => self.puzzles_played.into(),
            StatKey::PuzzlesSolved => self.puzzles_solved.into(),
            StatKey::ClassicPuzzlesSolved => self.classic_puzzles_solved.into(),
            StatKey::RainbowPuzzlesSolved => self.rainbow_puzzles_solved.into(),
            StatKey::PuzzlePerfects => self.puzzle_perfects.into(),
        }
    }

    /// Fold one finished game into the running totals.
    ///
    /// The per-rule tallies (upper bonus, kinds, straights) follow the
    /// Classic achievements that read them and only count Classic games.
    pub fn record_game(&mut self, game: &GameFinished) {
        let card = &game.scorecard;
        self.update_streak(game.finished_at);

        if card.is_complete() && card.zero_count() == 0 {
            self.perfect_games_completed += 1;
        }

        let bonus = u32::from(card.bonus_yahtzees());
        let yahtzees = if card.get(Category::Yahtzee) == Some(YAHTZEE_SCORE) {
            1 + bonus
        } else {
            0
        };

        match game.mode {
            GameMode::Classic => {
                self.classic_games_completed += 1;
                self.classic_high_scores.push(game.score);
                self.best_classic_score = self.best_classic_score.max(game.score);
                self.classic_average = rounded_average(&self.classic_high_scores);
                if yahtzees > 0 {
                    self.total_yahtzees_in_classic += yahtzees;
                    self.classic_bonus_yahtzees += bonus;
                }
                if card.upper_bonus() > 0 {
                    self.upper_bonuses_earned += 1;
                }
                let three = card.get(Category::ThreeOfKind).unwrap_or(0);
                let four = card.get(Category::FourOfKind).unwrap_or(0);
                if three >= STAT_THREE_OF_KIND_HIGH {
                    self.three_of_kind_20_plus += 1;
                }
                if four >= STAT_FOUR_OF_KIND_HIGH {
                    self.four_of_kind_25_plus += 1;
                }
                if four >= STAT_FOUR_OF_KIND_ELITE {
                    self.four_of_kind_30_plus += 1;
                }
                let small = card.get(Category::SmallStraight).unwrap_or(0);
                let large = card.get(Category::LargeStraight).unwrap_or(0);
                if small > 0 && large > 0 {
                    self.straight_shooter_games += 1;
                }
                if game.score >= STAT_CLASSIC_ELITE_SCORE {
                    self.classic_275_plus_games += 1;
                }
            }
            GameMode::Rainbow => {
                self.rainbow_games_completed += 1;
                self.rainbow_high_scores.push(game.score);
                self.total_rainbow_points += u64::from(game.score);
                self.best_rainbow_score = self.best_rainbow_score.max(game.score);
                self.rainbow_average = rounded_average(&self.rainbow_high_scores);
                if yahtzees > 0 {
                    self.total_yahtzees_in_rainbow += yahtzees;
                    self.rainbow_bonus_yahtzees += bonus;
                }
                if game.score >= STAT_RAINBOW_ELITE_SCORE {
                    self.rainbow_400_plus_games += 1;
                }
            }
        }

        self.total_games = self.classic_games_completed + self.rainbow_games_completed;
        self.both_modes_played = self.classic_games_completed > 0 && self.rainbow_games_completed > 0;
        self.last_game_date = Some(game.finished_at);
        self.last_updated = Some(game.finished_at);
    }

    /// Fold one finished puzzle attempt into the puzzle tallies.
    pub fn record_puzzle(&mut self, puzzle: &PuzzleFinished) {
        self.puzzles_played += 1;
        if puzzle.success {
            self.puzzles_solved += 1;
            match puzzle.mode {
                GameMode::Classic => self.classic_puzzles_solved += 1,
                GameMode::Rainbow => self.rainbow_puzzles_solved += 1,
            }
            if puzzle.perfect {
                self.puzzle_perfects += 1;
            }
        }
        self.last_updated = Some(puzzle.finished_at);
    }

    /// Consecutive calendar days (UTC) with at least one finished game.
    fn update_streak(&mut self, at: DateTime<Utc>) {
        let today = at.date_naive();
        self.streak = match self.last_game_date.map(|last| (today - last.date_naive()).num_days()) {
            None => 1,
            Some(0) => self.streak.max(1),
            Some(1) => self.streak.max(1) + 1,
            Some(days) if days > 1 => 1,
            // Clock went backwards; keep what we have.
            Some(_) => self.streak.max(1),
        };
    }
}
