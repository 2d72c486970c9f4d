use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use log::debug;
use rainbow_yahtzee_game::constants::DICE_PER_HAND;
use rainbow_yahtzee_game::{
    Category, Difficulty, FailReason, GameFinished, GameMode, GameSession, Puzzle, PuzzleAttempt,
    PuzzleOutcome, ScoreTotals, TurnError, encode_friendly, rng_from_seed,
};
use rand::Rng;
use serde::Serialize;

use crate::logic::policy::{GameplayStrategy, PlayerPolicy};

/// Configuration for a simulated game.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub mode: GameMode,
    pub players: usize,
    pub strategy: GameplayStrategy,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(mode: GameMode, strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            mode,
            players: 1,
            strategy,
        }
    }

    #[must_use]
    pub const fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    /// Upper bound on turns before a run is reported as stuck.
    fn turn_limit(&self) -> usize {
        self.players.max(1) * 21 * 4
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub name: String,
    pub score: u32,
    pub totals: ScoreTotals,
    pub bonus_yahtzees: u16,
    pub zeroes: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub seed: u64,
    pub share_code: String,
    pub mode: GameMode,
    pub strategy: GameplayStrategy,
    pub turns: usize,
    pub players: Vec<PlayerSummary>,
    pub winner: Option<String>,
    /// Rule checks that failed for this run.
    pub issues: Vec<String>,
    #[serde(skip)]
    pub events: Vec<GameFinished>,
}

impl GameSummary {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Roll, hold and stand for the active turn until the policy stops or the
/// rolls run out.
fn play_rolls<R>(
    session: &mut GameSession,
    policy: &mut dyn PlayerPolicy,
    rng: &mut R,
) -> Result<()>
where
    R: Rng + ?Sized,
{
    session.roll(rng)?;
    while session.turn().rolls_left() > 0 {
        let potentials = session.potentials();
        if policy.stands(&potentials) {
            break;
        }
        let open: Vec<Category> = potentials.iter().map(|&(c, _)| c).collect();
        let wanted = policy.holds(session.turn().hand(), &open);
        let held = session.turn().held();
        for index in 0..DICE_PER_HAND {
            if held[index] != wanted[index] {
                session.toggle_hold(index)?;
            }
        }
        session.roll(rng)?;
    }
    Ok(())
}

/// Play one complete seeded game.
///
/// # Errors
///
/// Returns an error when the session rejects a move the policy should never
/// make.
pub fn play_game(config: &SimulationConfig, finished_at: DateTime<Utc>) -> Result<GameSummary> {
    let names: Vec<String> = (1..=config.players.max(1)).map(|n| format!("Bot {n}")).collect();
    let mut session = GameSession::new(config.mode, names)?;
    let mut rng = rng_from_seed(config.seed);
    let mut policy = config.strategy.create_policy(config.seed);
    let mut turns = 0;
    let mut issues = Vec::new();

    while !session.is_complete() {
        if turns >= config.turn_limit() {
            issues.push(format!("game did not finish within {turns} turns"));
            break;
        }
        play_rolls(&mut session, policy.as_mut(), &mut rng)
            .with_context(|| format!("seed {} turn {}", config.seed, turns + 1))?;
        let potentials = session.potentials();
        let category = policy
            .pick_category(&potentials)
            .ok_or_else(|| anyhow!("policy {} picked no category", policy.name()))?;
        match session.select(category) {
            Ok(report) => debug!(
                "player {} {:?} -> {:?}",
                report.player, report.selection.category, report.selection.score
            ),
            Err(TurnError::MustScoreYahtzeeFirst) => {
                session.select(Category::Yahtzee)?;
            }
            Err(err) => return Err(err).context(format!("selecting {category}")),
        }
        turns += 1;
    }

    let players: Vec<PlayerSummary> = session
        .players()
        .iter()
        .map(|p| {
            let totals = p.scorecard.totals();
            PlayerSummary {
                name: p.name.clone(),
                score: totals.grand,
                totals,
                bonus_yahtzees: p.scorecard.bonus_yahtzees(),
                zeroes: p.scorecard.zero_count(),
            }
        })
        .collect();

    for player in &players {
        let t = player.totals;
        if t.upper + t.upper_bonus + t.lower + t.color != t.grand {
            issues.push(format!("{}: totals do not add up", player.name));
        }
    }

    let winner = session
        .standings()
        .first()
        .and_then(|&(index, _)| session.players().get(index))
        .map(|p| p.name.clone());

    Ok(GameSummary {
        seed: config.seed,
        share_code: encode_friendly(config.mode, config.seed),
        mode: config.mode,
        strategy: config.strategy,
        turns,
        players,
        winner,
        issues,
        events: session.finish(finished_at).unwrap_or_default(),
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRun {
    pub puzzle_id: String,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub success: bool,
    pub score: u32,
    pub attempts: u32,
    pub fail_reason: Option<FailReason>,
    #[serde(skip)]
    pub outcomes: Vec<PuzzleOutcome>,
}

fn play_attempt<R>(
    attempt: &mut PuzzleAttempt<'_>,
    policy: &mut dyn PlayerPolicy,
    rng: &mut R,
) -> Result<PuzzleOutcome>
where
    R: Rng + ?Sized,
{
    while !attempt.is_over() {
        let potentials = attempt.potentials();
        let ready = attempt.turn().has_rolled()
            && (attempt.turn().rolls_left() == 0 || policy.stands(&potentials));
        if ready {
            let category = policy
                .pick_category(&potentials)
                .ok_or_else(|| anyhow!("no open category"))?;
            attempt.select(category)?;
            continue;
        }
        if attempt.turn().has_rolled() && !attempt.turn().is_preset_showing() {
            let open: Vec<Category> = potentials.iter().map(|&(c, _)| c).collect();
            let wanted = policy.holds(attempt.turn().hand(), &open);
            let turn = attempt.turn();
            let (held, locked) = (turn.held(), turn.locked());
            for index in 0..DICE_PER_HAND {
                if !locked[index] && held[index] != wanted[index] {
                    attempt.toggle_hold(index)?;
                }
            }
        }
        attempt.roll(rng)?;
    }
    attempt
        .outcome()
        .ok_or_else(|| anyhow!("attempt ended without an outcome"))
}

/// Play `puzzle` until it is solved or `max_attempts` tries are spent.
///
/// # Errors
///
/// Returns an error when the attempt rejects a move the policy made.
pub fn play_puzzle(
    puzzle: &Puzzle,
    strategy: GameplayStrategy,
    seed: u64,
    max_attempts: u32,
) -> Result<PuzzleRun> {
    let mut rng = rng_from_seed(seed);
    let mut policy = strategy.create_policy(seed);
    let mut attempt = PuzzleAttempt::new(puzzle);
    let mut outcomes = Vec::new();

    for _ in 0..max_attempts.max(1) {
        let outcome = play_attempt(&mut attempt, policy.as_mut(), &mut rng)
            .with_context(|| format!("puzzle {}", puzzle.id))?;
        let solved = outcome.success;
        outcomes.push(outcome);
        if solved {
            break;
        }
        attempt.retry();
    }

    let last = outcomes
        .last()
        .ok_or_else(|| anyhow!("puzzle {} produced no attempts", puzzle.id))?;
    Ok(PuzzleRun {
        puzzle_id: puzzle.id.clone(),
        mode: puzzle.game_mode,
        difficulty: puzzle.difficulty,
        success: last.success,
        score: last.score,
        attempts: u32::try_from(outcomes.len()).unwrap_or(u32::MAX),
        fail_reason: last.fail_reason,
        outcomes,
    })
}
