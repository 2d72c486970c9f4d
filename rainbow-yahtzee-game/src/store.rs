//! Profile persistence seam.
//!
//! The engine only ever loads a whole record set and writes it back; stores
//! never need to diff or merge.
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use crate::achievements::AchievementLedger;
use crate::events::ScoreRecord;
use crate::puzzle::PuzzleRecords;
use crate::stats::AllTimeStats;

/// Whole-record-set persistence for one player profile.
pub trait ProfileStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// Returns an error if the stats cannot be read.
    fn load_stats(&self) -> Result<AllTimeStats, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the stats cannot be written.
    fn replace_stats(&self, stats: &AllTimeStats) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn load_achievements(&self) -> Result<AchievementLedger, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    fn replace_achievements(&self, ledger: &AchievementLedger) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    fn load_history(&self) -> Result<Vec<ScoreRecord>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the history cannot be written.
    fn replace_history(&self, history: &[ScoreRecord]) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the records cannot be read.
    fn load_puzzle_records(&self) -> Result<PuzzleRecords, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the records cannot be written.
    fn replace_puzzle_records(&self, records: &PuzzleRecords) -> Result<(), Self::Error>;

    /// Drop everything stored for the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of the profile cannot be removed.
    fn wipe(&self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Profile {
    stats: AllTimeStats,
    ledger: AchievementLedger,
    history: Vec<ScoreRecord>,
    puzzles: PuzzleRecords,
}

/// In-memory store; clones share one profile.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    profile: Rc<RefCell<Profile>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryStore {
    type Error = Infallible;

    fn load_stats(&self) -> Result<AllTimeStats, Self::Error> {
        Ok(self.profile.borrow().stats.clone())
    }

    fn replace_stats(&self, stats: &AllTimeStats) -> Result<(), Self::Error> {
        self.profile.borrow_mut().stats = stats.clone();
        Ok(())
    }

    fn load_achievements(&self) -> Result<AchievementLedger, Self::Error> {
        Ok(self.profile.borrow().ledger.clone())
    }

    fn replace_achievements(&self, ledger: &AchievementLedger) -> Result<(), Self::Error> {
        self.profile.borrow_mut().ledger = ledger.clone();
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<ScoreRecord>, Self::Error> {
        Ok(self.profile.borrow().history.clone())
    }

    fn replace_history(&self, history: &[ScoreRecord]) -> Result<(), Self::Error> {
        self.profile.borrow_mut().history = history.to_vec();
        Ok(())
    }

    fn load_puzzle_records(&self) -> Result<PuzzleRecords, Self::Error> {
        Ok(self.profile.borrow().puzzles.clone())
    }

    fn replace_puzzle_records(&self, records: &PuzzleRecords) -> Result<(), Self::Error> {
        self.profile.borrow_mut().puzzles = records.clone();
        Ok(())
    }

    fn wipe(&self) -> Result<(), Self::Error> {
        *self.profile.borrow_mut() = Profile::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PuzzleRecord;

    #[test]
    fn clones_share_state_and_wipe_clears_it() {
        let store = MemoryStore::new();
        let view = store.clone();
        let stats = AllTimeStats {
            total_games: 3,
            ..AllTimeStats::default()
        };
        store.replace_stats(&stats).unwrap();
        let mut records = PuzzleRecords::new();
        records.insert("p".into(), PuzzleRecord::new("p"));
        store.replace_puzzle_records(&records).unwrap();

        assert_eq!(view.load_stats().unwrap().total_games, 3);
        assert_eq!(view.load_puzzle_records().unwrap().len(), 1);

        view.wipe().unwrap();
        assert_eq!(store.load_stats().unwrap(), AllTimeStats::default());
        assert!(store.load_history().unwrap().is_empty());
        assert_eq!(store.load_achievements().unwrap(), AchievementLedger::new());
    }
}
