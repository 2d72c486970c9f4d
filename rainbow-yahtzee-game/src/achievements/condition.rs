//! Achievement conditions: a tagged union evaluated by a single dispatcher.
use serde::{Deserialize, Serialize};

use crate::category::{Category, GameMode};
use crate::scorecard::Scorecard;
use crate::stats::{AllTimeStats, StatKey};

use super::AchievementCategory;

/// Facts a condition may read.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub mode: GameMode,
    /// Final card of the game being evaluated; `None` for puzzle events.
    pub scorecard: Option<&'a Scorecard>,
    pub stats: &'a AllTimeStats,
    pub puzzle: Option<PuzzleContext>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleContext {
    pub success: bool,
    pub attempts: u32,
}

impl<'a> EvaluationContext<'a> {
    #[must_use]
    pub const fn game(scorecard: &'a Scorecard, stats: &'a AllTimeStats) -> Self {
        Self {
            mode: scorecard.mode(),
            scorecard: Some(scorecard),
            stats,
            puzzle: None,
        }
    }

    #[must_use]
    pub const fn puzzle(mode: GameMode, success: bool, attempts: u32, stats: &'a AllTimeStats) -> Self {
        Self {
            mode,
            scorecard: None,
            stats,
            puzzle: Some(PuzzleContext { success, attempts }),
        }
    }

    /// The evaluated card, only once every category is filled.
    fn complete_card(&self) -> Option<&'a Scorecard> {
        self.scorecard.filter(|card| card.is_complete())
    }
}

/// Value a condition evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionValue {
    Flag(bool),
    /// Absolute value of a tracked quantity, compared against the target.
    Progress(u64),
}

/// Unlock rule of an achievement.
///
/// Scorecard predicates are only satisfiable on a complete card; a partial
/// card evaluates to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Progress: one statistic.
    Stat { stat: StatKey },
    /// Progress: several statistics added together.
    StatSum { stats: Vec<StatKey> },
    /// Progress: unlocked achievements per category, each capped at
    /// `min_each`. Evaluated after the rest of the batch.
    CategoryUnlocks {
        categories: Vec<AchievementCategory>,
        min_each: u32,
    },
    BothModesPlayed,
    /// Some Classic score reached `classic` and some Rainbow score reached `rainbow`.
    HighScoresReached { classic: u32, rainbow: u32 },
    ZeroCountAtMost {
        max: usize,
        #[serde(default)]
        categories: Option<Vec<Category>>,
    },
    ZeroCountAtLeast { min: usize },
    CategoryAtLeast { category: Category, min: u16 },
    CategoryEquals { category: Category, value: u16 },
    /// At least `count` of `categories` scored `min_score` or more.
    CountAtLeast {
        categories: Vec<Category>,
        min_score: u16,
        count: usize,
    },
    GrandTotalAtLeast { min: u32 },
    BonusYahtzeesAtLeast { min: u16 },
    /// Puzzle solved within `attempts` tries.
    PuzzleSolvedWithin { attempts: u32 },
    All { conditions: Vec<Condition> },
}

impl Condition {
    /// Whether this condition is resolved after the main evaluation pass.
    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::CategoryUnlocks { .. })
    }

    /// Evaluate against `ctx`. Deferred conditions yield `Flag(false)` here;
    /// the engine resolves them from the ledger.
    #[must_use]
    pub fn evaluate(&self, ctx: &EvaluationContext<'_>) -> ConditionValue {
        match self {
            Self::Stat { stat } => ConditionValue::Progress(ctx.stats.stat(*stat)),
            Self::StatSum { stats } => {
                ConditionValue::Progress(stats.iter().map(|s| ctx.stats.stat(*s)).sum())
            }
            Self::CategoryUnlocks { .. } => ConditionValue::Flag(false),
            other => ConditionValue::Flag(other.check(ctx)),
        }
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> bool {
        let card = ctx.complete_card();
        match self {
            Self::BothModesPlayed => ctx.stats.both_modes_played,
            Self::HighScoresReached { classic, rainbow } => {
                ctx.stats.classic_high_scores.iter().any(|s| s >= classic)
                    && ctx.stats.rainbow_high_scores.iter().any(|s| s >= rainbow)
            }
            Self::ZeroCountAtMost { max, categories } => card.is_some_and(|card| {
                let zeroes = match categories {
                    Some(list) => list.iter().filter(|c| card.get(**c) == Some(0)).count(),
                    None => card.zero_count(),
                };
                zeroes <= *max
            }),
            Self::ZeroCountAtLeast { min } => card.is_some_and(|card| card.zero_count() >= *min),
            Self::CategoryAtLeast { category, min } => {
                card.is_some_and(|card| card.get(*category).is_some_and(|s| s >= *min))
            }
            Self::CategoryEquals { category, value } => {
                card.is_some_and(|card| card.get(*category) == Some(*value))
            }
            Self::CountAtLeast {
                categories,
                min_score,
                count,
            } => card.is_some_and(|card| {
                categories
                    .iter()
                    .filter(|c| card.get(**c).is_some_and(|s| s >= *min_score))
                    .count()
                    >= *count
            }),
            Self::GrandTotalAtLeast { min } => card.is_some_and(|card| card.grand_total() >= *min),
            Self::BonusYahtzeesAtLeast { min } => {
                card.is_some_and(|card| card.bonus_yahtzees() >= *min)
            }
            Self::PuzzleSolvedWithin { attempts } => ctx
                .puzzle
                .is_some_and(|p| p.success && p.attempts > 0 && p.attempts <= *attempts),
            Self::All { conditions } => conditions
                .iter()
                .all(|c| c.evaluate(ctx) == ConditionValue::Flag(true)),
            Self::Stat { .. } | Self::StatSum { .. } | Self::CategoryUnlocks { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_with(mode: GameMode, value: impl Fn(Category) -> u16) -> Scorecard {
        Scorecard::from_scores(mode, mode.categories().iter().map(|&c| (c, value(c)))).unwrap()
    }

    #[test]
    fn partial_card_never_satisfies() {
        let stats = AllTimeStats::default();
        let card = Scorecard::from_scores(GameMode::Classic, [(Category::Chance, 30)]).unwrap();
        let ctx = EvaluationContext::game(&card, &stats);
        let cond = Condition::CategoryAtLeast {
            category: Category::Chance,
            min: 26,
        };
        assert_eq!(cond.evaluate(&ctx), ConditionValue::Flag(false));
        let no_zeroes = Condition::ZeroCountAtMost {
            max: 0,
            categories: None,
        };
        assert_eq!(no_zeroes.evaluate(&ctx), ConditionValue::Flag(false));
    }

    #[test]
    fn complete_card_predicates() {
        let stats = AllTimeStats::default();
        let card = card_with(GameMode::Classic, |c| match c {
            Category::Chance => 27,
            Category::Yahtzee => 0,
            Category::Aces | Category::Twos => 0,
            _ => 12,
        });
        let ctx = EvaluationContext::game(&card, &stats);
        let flag = |cond: Condition| cond.evaluate(&ctx) == ConditionValue::Flag(true);

        assert!(flag(Condition::CategoryAtLeast {
            category: Category::Chance,
            min: 26
        }));
        assert!(flag(Condition::ZeroCountAtLeast { min: 3 }));
        assert!(!flag(Condition::ZeroCountAtMost {
            max: 2,
            categories: None
        }));
        assert!(flag(Condition::ZeroCountAtMost {
            max: 0,
            categories: Some(vec![Category::Threes, Category::Chance]),
        }));
        assert!(flag(Condition::All {
            conditions: vec![
                Condition::CategoryEquals {
                    category: Category::Yahtzee,
                    value: 0
                },
                Condition::GrandTotalAtLeast { min: 100 },
            ]
        }));
        assert!(flag(Condition::CountAtLeast {
            categories: Category::LOWER.to_vec(),
            min_score: 12,
            count: 6,
        }));
    }

    #[test]
    fn stat_progress_is_absolute() {
        let stats = AllTimeStats {
            classic_high_scores: vec![200, 150],
            total_rainbow_points: 400,
            ..AllTimeStats::default()
        };
        let ctx = EvaluationContext::puzzle(GameMode::Classic, true, 1, &stats);
        let cond = Condition::StatSum {
            stats: vec![StatKey::TotalClassicPoints, StatKey::TotalRainbowPoints],
        };
        assert_eq!(cond.evaluate(&ctx), ConditionValue::Progress(750));
        assert_eq!(
            Condition::PuzzleSolvedWithin { attempts: 1 }.evaluate(&ctx),
            ConditionValue::Flag(true)
        );
    }

    #[test]
    fn conditions_parse_from_json() {
        let cond: Condition = serde_json::from_str(
            r#"{"kind":"count_at_least","categories":["allRed","allBlue"],"min_score":50,"count":2}"#,
        )
        .unwrap();
        assert!(matches!(cond, Condition::CountAtLeast { count: 2, .. }));
        let stat: Condition =
            serde_json::from_str(r#"{"kind":"stat","stat":"upperBonusesEarned"}"#).unwrap();
        assert_eq!(
            stat,
            Condition::Stat {
                stat: StatKey::UpperBonusesEarned
            }
        );
    }
}
