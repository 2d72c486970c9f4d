//! Profile store backed by one JSON file per record set.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rainbow_yahtzee_game::{AchievementLedger, AllTimeStats, ProfileStore, PuzzleRecords, ScoreRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

const STATS_FILE: &str = "stats.json";
const ACHIEVEMENTS_FILE: &str = "achievements.json";
const HISTORY_FILE: &str = "history.json";
const PUZZLES_FILE: &str = "puzzles.json";

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| FileStoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Missing files read as the default value.
    fn read<T>(&self, name: &str) -> Result<T, FileStoreError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.dir.join(name);
        match fs::read_to_string(&path) {
            Ok(text) => {
                serde_json::from_str(&text).map_err(|source| FileStoreError::Serialization {
                    path,
                    source,
                })
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(source) => Err(FileStoreError::Io { path, source }),
        }
    }

    fn write<T>(&self, name: &str, value: &T) -> Result<(), FileStoreError>
    where
        T: Serialize + ?Sized,
    {
        let path = self.dir.join(name);
        let text = serde_json::to_string_pretty(value).map_err(|source| {
            FileStoreError::Serialization {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, text).map_err(|source| FileStoreError::Io { path, source })
    }
}

impl ProfileStore for JsonFileStore {
    type Error = FileStoreError;

    fn load_stats(&self) -> Result<AllTimeStats, Self::Error> {
        self.read(STATS_FILE)
    }

    fn replace_stats(&self, stats: &AllTimeStats) -> Result<(), Self::Error> {
        self.write(STATS_FILE, stats)
    }

    fn load_achievements(&self) -> Result<AchievementLedger, Self::Error> {
        self.read(ACHIEVEMENTS_FILE)
    }

    fn replace_achievements(&self, ledger: &AchievementLedger) -> Result<(), Self::Error> {
        self.write(ACHIEVEMENTS_FILE, ledger)
    }

    fn load_history(&self) -> Result<Vec<ScoreRecord>, Self::Error> {
        self.read(HISTORY_FILE)
    }

    fn replace_history(&self, history: &[ScoreRecord]) -> Result<(), Self::Error> {
        self.write(HISTORY_FILE, history)
    }

    fn load_puzzle_records(&self) -> Result<PuzzleRecords, Self::Error> {
        self.read(PUZZLES_FILE)
    }

    fn replace_puzzle_records(&self, records: &PuzzleRecords) -> Result<(), Self::Error> {
        self.write(PUZZLES_FILE, records)
    }

    fn wipe(&self) -> Result<(), Self::Error> {
        for name in [STATS_FILE, ACHIEVEMENTS_FILE, HISTORY_FILE, PUZZLES_FILE] {
            let path = self.dir.join(name);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(FileStoreError::Io { path, source }),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rainbow_yahtzee_game::{GameFinished, GameMode, ProfileEngine, Scorecard};

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "rainbow-yahtzee-store-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn empty_directory_loads_defaults() {
        let store = JsonFileStore::open(temp_dir("empty")).unwrap();
        assert_eq!(store.load_stats().unwrap(), AllTimeStats::default());
        assert!(store.load_history().unwrap().is_empty());
        assert!(store.load_puzzle_records().unwrap().is_empty());
        assert_eq!(store.load_achievements().unwrap().unlocked_count(), 0);
    }

    #[test]
    fn profile_survives_reopen_and_wipe() {
        let dir = temp_dir("reopen");
        let card = Scorecard::from_scores(
            GameMode::Classic,
            GameMode::Classic.categories().iter().map(|&c| (c, 5)),
        )
        .unwrap();
        let event = GameFinished::new("Ada", card, chrono::Utc::now());
        ProfileEngine::new(JsonFileStore::open(&dir).unwrap())
            .record_game(&event)
            .unwrap();

        let reopened = JsonFileStore::open(&dir).unwrap();
        assert_eq!(reopened.load_stats().unwrap().total_games, 1);
        assert_eq!(reopened.load_history().unwrap().len(), 1);

        reopened.wipe().unwrap();
        assert_eq!(reopened.load_stats().unwrap().total_games, 0);
        reopened.wipe().unwrap();
    }

    #[test]
    fn corrupt_file_reports_its_path() {
        let store = JsonFileStore::open(temp_dir("corrupt")).unwrap();
        fs::write(store.dir().join(STATS_FILE), "{not json").unwrap();
        let err = store.load_stats().unwrap_err();
        assert!(matches!(err, FileStoreError::Serialization { .. }));
        assert!(err.to_string().contains(STATS_FILE));
    }
}
