//! Multi-player game sessions: round-robin turns over per-player scorecards.
use chrono::{DateTime, Utc};
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::{Category, GameMode};
use crate::dice::Hand;
use crate::events::GameFinished;
use crate::scorecard::Scorecard;
use crate::turn::{Selection, TurnError, TurnState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a game needs at least one player")]
    NoPlayers,
    #[error("player {0} has an empty name")]
    EmptyName(usize),
    #[error(transparent)]
    Turn(#[from] TurnError),
}

impl SessionError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoPlayers => "no_players",
            Self::EmptyName(_) => "empty_name",
            Self::Turn(err) => err.code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub scorecard: Scorecard,
}

/// Outcome of an accepted selection within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub player: usize,
    pub selection: Selection,
    /// Player holding the dice after the selection.
    pub next_player: usize,
    pub game_complete: bool,
}

/// A game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    mode: GameMode,
    players: Vec<Player>,
    current: usize,
    turn: TurnState,
    complete: bool,
}

impl GameSession {
    /// Start a game with one scorecard per named player.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty roster or a blank name.
    pub fn new<I, N>(mode: GameMode, names: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut players = Vec::new();
        for (index, name) in names.into_iter().enumerate() {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(SessionError::EmptyName(index));
            }
            players.push(Player {
                name,
                scorecard: Scorecard::new(mode),
            });
        }
        if players.is_empty() {
            return Err(SessionError::NoPlayers);
        }
        debug!("new {mode} game with {} players", players.len());
        Ok(Self {
            mode,
            players,
            current: 0,
            turn: TurnState::new(mode),
            complete: false,
        })
    }

    #[must_use]
    pub const fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub const fn current_player_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    #[must_use]
    pub const fn turn(&self) -> &TurnState {
        &self.turn
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Roll for the active player.
    ///
    /// # Errors
    ///
    /// Returns an error once the game is over or the turn's rolls are spent.
    pub fn roll<R>(&mut self, rng: &mut R) -> Result<Hand, TurnError>
    where
        R: Rng + ?Sized,
    {
        self.ensure_running()?;
        self.turn.roll(rng)
    }

    /// # Errors
    ///
    /// See [`TurnState::toggle_hold`]; also rejected after the game ends.
    pub fn toggle_hold(&mut self, index: usize) -> Result<bool, TurnError> {
        self.ensure_running()?;
        self.turn.toggle_hold(index)
    }

    /// Points the active hand would earn in every open category of the
    /// active player's card.
    #[must_use]
    pub fn potentials(&self) -> Vec<(Category, u16)> {
        if !self.turn.has_rolled() {
            return Vec::new();
        }
        self.current_player()
            .scorecard
            .open_categories()
            .map(|category| (category, self.turn.potential(category)))
            .collect()
    }

    /// Score the active hand, end the turn and hand the dice on.
    ///
    /// # Errors
    ///
    /// Returns the turn's rejection unchanged; nothing is mutated on error.
    pub fn select(&mut self, category: Category) -> Result<TurnReport, TurnError> {
        self.ensure_running()?;
        let player = self.current;
        let selection = self
            .turn
            .select(&mut self.players[player].scorecard, category)?;

        self.complete = self.players.iter().all(|p| p.scorecard.is_complete());
        if self.complete {
            info!("{} game complete", self.mode);
        } else {
            self.advance(1);
        }
        self.turn = TurnState::new(self.mode);
        Ok(TurnReport {
            player,
            selection,
            next_player: self.current,
            game_complete: self.complete,
        })
    }

    /// Hand the dice to the next player without scoring.
    ///
    /// # Errors
    ///
    /// Rejected once the active player has rolled or the game is over.
    pub fn pass_turn(&mut self) -> Result<usize, TurnError> {
        self.ensure_unrolled()?;
        self.advance(1);
        Ok(self.current)
    }

    /// Hand the dice back to the previous player without scoring.
    ///
    /// # Errors
    ///
    /// Rejected once the active player has rolled or the game is over.
    pub fn previous_player(&mut self) -> Result<usize, TurnError> {
        self.ensure_unrolled()?;
        self.advance(self.players.len() - 1);
        Ok(self.current)
    }

    /// One finished-game event per player once every card is complete.
    #[must_use]
    pub fn finish(&self, finished_at: DateTime<Utc>) -> Option<Vec<GameFinished>> {
        self.complete.then(|| {
            self.players
                .iter()
                .map(|p| GameFinished::new(p.name.clone(), p.scorecard.clone(), finished_at))
                .collect()
        })
    }

    /// Player indices ordered by grand total, best first.
    #[must_use]
    pub fn standings(&self) -> Vec<(usize, u32)> {
        let mut ranked: Vec<(usize, u32)> = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.scorecard.grand_total()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }

    const fn ensure_running(&self) -> Result<(), TurnError> {
        if self.complete {
            Err(TurnError::GameOver)
        } else {
            Ok(())
        }
    }

    const fn ensure_unrolled(&self) -> Result<(), TurnError> {
        if self.complete {
            return Err(TurnError::GameOver);
        }
        if self.turn.has_rolled() {
            return Err(TurnError::AlreadyRolled);
        }
        Ok(())
    }

    /// Move `step` seats round the table, skipping players whose card is full.
    fn advance(&mut self, step: usize) {
        let count = self.players.len();
        for _ in 0..count {
            self.current = (self.current + step) % count;
            if !self.players[self.current].scorecard.is_complete() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn roster_validation() {
        assert_eq!(
            GameSession::new(GameMode::Classic, Vec::<String>::new()),
            Err(SessionError::NoPlayers)
        );
        let err = GameSession::new(GameMode::Classic, ["Ada", " "]).unwrap_err();
        assert_eq!(err.code(), "empty_name");
    }

    #[test]
    fn selection_rotates_players() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut game = GameSession::new(GameMode::Rainbow, ["Ada", "Bo", "Cy"]).unwrap();
        game.roll(&mut rng).unwrap();
        let report = game.select(Category::Chance).unwrap();
        assert_eq!(report.player, 0);
        assert_eq!(report.next_player, 1);
        assert!(!game.turn().has_rolled());
        assert!(game.players()[0].scorecard.is_filled(Category::Chance));
    }

    #[test]
    fn pass_only_before_rolling() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut game = GameSession::new(GameMode::Classic, ["Ada", "Bo"]).unwrap();
        assert_eq!(game.pass_turn(), Ok(1));
        assert_eq!(game.previous_player(), Ok(0));
        game.roll(&mut rng).unwrap();
        assert_eq!(game.pass_turn(), Err(TurnError::AlreadyRolled));
        assert_eq!(game.current_player_index(), 0);
    }

    #[test]
    fn rejected_selection_leaves_session_untouched() {
        let mut game = GameSession::new(GameMode::Classic, ["Ada"]).unwrap();
        let before = game.clone();
        assert_eq!(game.select(Category::Aces), Err(TurnError::NotRolled));
        assert_eq!(game, before);
    }

    #[test]
    fn solo_game_completes_after_every_category() {
        let mut rng = SmallRng::seed_from_u64(77);
        let mut game = GameSession::new(GameMode::Classic, ["Ada"]).unwrap();
        let mut turns = 0;
        while !game.is_complete() {
            game.roll(&mut rng).unwrap();
            let open: Vec<Category> = game.current_player().scorecard.open_categories().collect();
            let picked = open
                .iter()
                .copied()
                .find(|&c| game.clone().select(c).is_ok())
                .unwrap();
            game.select(picked).unwrap();
            turns += 1;
            assert!(turns < 100);
        }
        assert!(game.players()[0].scorecard.is_complete());
        assert_eq!(game.roll(&mut rng), Err(TurnError::GameOver));
        let events = game.finish(Utc::now()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].score, game.players()[0].scorecard.grand_total());
    }
}
