//! Rainbow Yahtzee Game Engine
//!
//! Platform-agnostic rules and progression for Classic and Rainbow Yahtzee.
//! This crate provides scoring, turns, sessions, puzzles, statistics and
//! achievements without UI or platform-specific dependencies.

pub mod achievements;
pub mod catalog;
pub mod category;
pub mod constants;
pub mod dice;
pub mod events;
pub mod game;
pub mod numbers;
pub mod puzzle;
pub mod scorecard;
pub mod scoring;
pub mod seed;
pub mod stats;
pub mod store;
pub mod turn;

use chrono::{DateTime, Utc};
use log::{debug, info};
use thiserror::Error;

// Re-export commonly used types
pub use achievements::{
    AchievementCatalog, AchievementCategory, AchievementDef, AchievementLedger,
    AchievementProgress, AchievementStatus, Condition, EvaluationContext, evaluate_game,
    evaluate_puzzle,
};
pub use catalog::CatalogError;
pub use category::{Category, GameMode, Section};
pub use dice::{Colors, Dice, DiceColor, Hand};
pub use events::{GameFinished, PuzzleFinished, ScoreRecord};
pub use game::{GameSession, Player, SessionError, TurnReport};
pub use puzzle::{
    Difficulty, FailReason, ObjectiveKind, ObjectiveStatus, Puzzle, PuzzleAttempt, PuzzleCatalog,
    PuzzleError, PuzzleOutcome, PuzzleRecord, PuzzleRecords,
};
pub use scorecard::{ScoreTotals, Scorecard, ScorecardError};
pub use scoring::score_category;
pub use seed::{decode_to_seed, encode_friendly, generate_code_from_entropy, parse_share_code, rng_from_seed};
pub use stats::{AllTimeStats, StatKey};
pub use store::{MemoryStore, ProfileStore};
pub use turn::{Ruling, Selection, TurnError, TurnPhase, TurnState};

/// Why the profile engine refused to record a finished game.
#[derive(Debug, Error)]
pub enum ProfileError<E>
where
    E: std::error::Error + 'static,
{
    #[error("profile store failed: {0}")]
    Store(#[from] E),
    #[error("{player} finished {mode} with {open} categories still open")]
    IncompleteCard {
        player: String,
        mode: GameMode,
        open: usize,
    },
}

impl<E> ProfileError<E>
where
    E: std::error::Error + 'static,
{
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Store(_) => "store",
            Self::IncompleteCard { .. } => "incomplete_card",
        }
    }
}

/// What recording a finished puzzle attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleReport<'c> {
    pub event: PuzzleFinished,
    pub unlocked: Vec<&'c AchievementDef>,
}

/// Progression front end for one profile: folds finished games and puzzle
/// attempts into the stored history, stats, records and achievement ledger.
pub struct ProfileEngine<'c, S>
where
    S: ProfileStore,
{
    store: S,
    catalog: &'c AchievementCatalog,
}

impl<S> ProfileEngine<'static, S>
where
    S: ProfileStore,
{
    /// Engine over the embedded achievement catalog.
    pub fn new(store: S) -> Self {
        Self::with_catalog(store, achievements::catalog())
    }
}

impl<'c, S> ProfileEngine<'c, S>
where
    S: ProfileStore,
{
    pub const fn with_catalog(store: S, catalog: &'c AchievementCatalog) -> Self {
        Self { store, catalog }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Append the game to the history, update stats, then evaluate
    /// achievements against the updated stats.
    ///
    /// Returns the achievements unlocked by this game in evaluation order.
    /// A game already present in the history is left alone and unlocks
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::IncompleteCard`] when the scorecard still has
    /// open categories, or the store's error if any load or replace fails.
    pub fn record_game(
        &self,
        game: &GameFinished,
    ) -> Result<Vec<&'c AchievementDef>, ProfileError<S::Error>> {
        if !game.scorecard.is_complete() {
            return Err(ProfileError::IncompleteCard {
                player: game.player_name.clone(),
                mode: game.mode,
                open: game.scorecard.open_categories().count(),
            });
        }

        let mut history = self.store.load_history()?;
        if history.iter().any(|record| record.is_same_game(game)) {
            debug!(
                "{} game at {} already recorded",
                game.player_name, game.finished_at
            );
            return Ok(Vec::new());
        }
        history.push(ScoreRecord::from(game));
        self.store.replace_history(&history)?;

        let mut stats = self.store.load_stats()?;
        stats.record_game(game);
        self.store.replace_stats(&stats)?;

        let mut ledger = self.store.load_achievements()?;
        let ctx = EvaluationContext::game(&game.scorecard, &stats);
        let unlocked = evaluate_game(self.catalog, &mut ledger, &ctx, game.finished_at);
        self.store.replace_achievements(&ledger)?;

        info!(
            "{} finished {} with {} ({} unlocks)",
            game.player_name,
            game.mode,
            game.score,
            unlocked.len()
        );
        Ok(unlocked)
    }

    /// Update the puzzle's record and the puzzle tallies, then evaluate
    /// puzzle achievements.
    ///
    /// # Errors
    ///
    /// Returns the store's error if any load or replace fails.
    pub fn record_puzzle(
        &self,
        outcome: &PuzzleOutcome,
        finished_at: DateTime<Utc>,
    ) -> Result<PuzzleReport<'c>, S::Error> {
        let mut records = self.store.load_puzzle_records()?;
        let event = puzzle::record_outcome(&mut records, outcome, finished_at);
        self.store.replace_puzzle_records(&records)?;

        let mut stats = self.store.load_stats()?;
        stats.record_puzzle(&event);
        self.store.replace_stats(&stats)?;

        let mut ledger = self.store.load_achievements()?;
        let ctx = EvaluationContext::puzzle(event.mode, event.success, event.attempts, &stats);
        let unlocked = evaluate_puzzle(self.catalog, &mut ledger, &ctx, finished_at);
        self.store.replace_achievements(&ledger)?;

        info!(
            "puzzle {} {} on attempt {}",
            event.puzzle_id,
            if event.success { "solved" } else { "failed" },
            event.attempts
        );
        Ok(PuzzleReport { event, unlocked })
    }

    /// Every catalog achievement with the profile's progress on it.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the ledger cannot be loaded.
    pub fn achievements_with_progress(&self) -> Result<Vec<AchievementStatus<'c>>, S::Error> {
        let ledger = self.store.load_achievements()?;
        Ok(self.catalog.with_progress(&ledger))
    }

    /// # Errors
    ///
    /// Returns the store's error if the stats cannot be loaded.
    pub fn stats(&self) -> Result<AllTimeStats, S::Error> {
        self.store.load_stats()
    }

    /// # Errors
    ///
    /// Returns the store's error if the history cannot be loaded.
    pub fn history(&self) -> Result<Vec<ScoreRecord>, S::Error> {
        self.store.load_history()
    }

    /// # Errors
    ///
    /// Returns the store's error if the records cannot be loaded.
    pub fn puzzle_records(&self) -> Result<PuzzleRecords, S::Error> {
        self.store.load_puzzle_records()
    }

    /// Reset the profile.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the wipe fails.
    pub fn wipe(&self) -> Result<(), S::Error> {
        self.store.wipe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, 20, 0, 0).unwrap()
    }

    fn full_card(mode: GameMode, value: u16) -> Scorecard {
        Scorecard::from_scores(mode, mode.categories().iter().map(|&c| (c, value))).unwrap()
    }

    #[test]
    fn recording_a_game_updates_every_record() {
        let engine = ProfileEngine::new(MemoryStore::new());
        let game = GameFinished::new("Ada", full_card(GameMode::Classic, 10), at(1));
        let unlocked = engine.record_game(&game).unwrap();

        assert!(unlocked.iter().any(|d| d.id == "no-miss"));
        assert_eq!(engine.history().unwrap().len(), 1);
        assert_eq!(engine.history().unwrap()[0].score, game.score);
        let stats = engine.stats().unwrap();
        assert_eq!(stats.classic_games_completed, 1);
        assert_eq!(stats.total_games, 1);
        assert!(engine.store().load_achievements().unwrap().is_unlocked("no-miss"));
    }

    #[test]
    fn replaying_history_never_double_unlocks() {
        let engine = ProfileEngine::new(MemoryStore::new());
        let game = GameFinished::new("Ada", full_card(GameMode::Rainbow, 20), at(2));
        let first = engine.record_game(&game).unwrap();
        let again = engine
            .record_game(&GameFinished {
                finished_at: game.finished_at + Duration::hours(1),
                ..game.clone()
            })
            .unwrap();
        assert!(!first.is_empty());
        assert!(again.iter().all(|d| !first.contains(d)));
        assert_eq!(engine.stats().unwrap().rainbow_games_completed, 2);
    }

    #[test]
    fn identical_game_is_recorded_once() {
        let engine = ProfileEngine::new(MemoryStore::new());
        let game = GameFinished::new("Ada", full_card(GameMode::Classic, 10), at(6));
        assert!(!engine.record_game(&game).unwrap().is_empty());
        let ledger = engine.store().load_achievements().unwrap();
        let stats = engine.stats().unwrap();

        assert!(engine.record_game(&game.clone()).unwrap().is_empty());
        assert_eq!(engine.store().load_achievements().unwrap(), ledger);
        assert_eq!(engine.stats().unwrap(), stats);
        assert_eq!(engine.history().unwrap().len(), 1);
        assert_eq!(ledger.get("game-grinder").map(|p| p.progress), Some(1));
    }

    #[test]
    fn incomplete_card_is_refused() {
        let engine = ProfileEngine::new(MemoryStore::new());
        let card = Scorecard::from_scores(GameMode::Classic, [(Category::Chance, 20)]).unwrap();
        let err = engine
            .record_game(&GameFinished::new("Ada", card, at(7)))
            .unwrap_err();
        assert_eq!(err.code(), "incomplete_card");
        assert!(matches!(err, ProfileError::IncompleteCard { open: 12, .. }));
        assert_eq!(engine.stats().unwrap(), AllTimeStats::default());
        assert!(engine.history().unwrap().is_empty());
    }

    #[test]
    fn puzzle_outcomes_flow_into_records_and_achievements() {
        let engine = ProfileEngine::new(MemoryStore::new());
        let outcome = PuzzleOutcome {
            puzzle_id: "classic-easy-2".into(),
            mode: GameMode::Classic,
            success: true,
            score: 25,
            all_positive: true,
            fail_reason: None,
        };
        let report = engine.record_puzzle(&outcome, at(3)).unwrap();
        assert!(report.event.perfect);
        let ids: Vec<&str> = report.unlocked.iter().map(|d| d.id.as_str()).collect();
        assert!(ids.contains(&"first-try"));
        assert!(ids.contains(&"puzzle-novice"));

        let second = engine.record_puzzle(&outcome, at(4)).unwrap();
        assert_eq!(second.event.attempts, 2);
        assert!(!second.event.perfect);
        assert!(second.unlocked.is_empty());

        let stats = engine.stats().unwrap();
        assert_eq!((stats.puzzles_played, stats.puzzles_solved, stats.puzzle_perfects), (2, 2, 1));
        assert_eq!(engine.puzzle_records().unwrap()["classic-easy-2"].attempts, 2);
    }

    #[test]
    fn listing_and_wipe() {
        let engine = ProfileEngine::new(MemoryStore::new());
        engine
            .record_game(&GameFinished::new("Ada", full_card(GameMode::Classic, 10), at(5)))
            .unwrap();
        let listing = engine.achievements_with_progress().unwrap();
        assert_eq!(listing.len(), achievements::catalog().achievements.len());
        assert!(listing.iter().any(|s| s.progress.unlocked));

        engine.wipe().unwrap();
        assert!(engine.history().unwrap().is_empty());
        assert!(engine.achievements_with_progress().unwrap().iter().all(|s| !s.progress.unlocked));
    }
}
