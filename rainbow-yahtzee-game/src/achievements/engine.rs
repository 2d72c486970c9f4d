//! Achievement evaluation after a finished game or puzzle attempt.
use chrono::{DateTime, Utc};
use log::{debug, info};

use super::condition::{Condition, ConditionValue, EvaluationContext};
use super::{AchievementCatalog, AchievementCategory, AchievementDef, AchievementLedger};

/// Evaluate every locked, applicable achievement after a finished game.
///
/// Puzzle achievements are skipped; non-dual achievements must list the
/// game's mode. Deferred conditions (mode mastery) are resolved after the
/// main pass so they see unlocks made within it. Returns the new unlocks in
/// evaluation order.
pub fn evaluate_game<'c>(
    catalog: &'c AchievementCatalog,
    ledger: &mut AchievementLedger,
    ctx: &EvaluationContext<'_>,
    now: DateTime<Utc>,
) -> Vec<&'c AchievementDef> {
    let applicable = |def: &AchievementDef| match def.category {
        AchievementCategory::Puzzle => false,
        AchievementCategory::Dual => true,
        AchievementCategory::Classic | AchievementCategory::Rainbow => def.applies_to(ctx.mode),
    };
    run(catalog, ledger, ctx, now, applicable)
}

/// Evaluate puzzle achievements for the puzzle's mode after a solved attempt.
/// A failed attempt unlocks nothing.
pub fn evaluate_puzzle<'c>(
    catalog: &'c AchievementCatalog,
    ledger: &mut AchievementLedger,
    ctx: &EvaluationContext<'_>,
    now: DateTime<Utc>,
) -> Vec<&'c AchievementDef> {
    if !ctx.puzzle.is_some_and(|p| p.success) {
        return Vec::new();
    }
    let mode = ctx.mode;
    let applicable =
        move |def: &AchievementDef| def.category == AchievementCategory::Puzzle && def.applies_to(mode);
    run(catalog, ledger, ctx, now, applicable)
}

fn run<'c, F>(
    catalog: &'c AchievementCatalog,
    ledger: &mut AchievementLedger,
    ctx: &EvaluationContext<'_>,
    now: DateTime<Utc>,
    applicable: F,
) -> Vec<&'c AchievementDef>
where
    F: Fn(&AchievementDef) -> bool,
{
    let mut unlocked = Vec::new();
    let mut deferred = Vec::new();

    for def in &catalog.achievements {
        if ledger.is_unlocked(&def.id) || !applicable(def) {
            continue;
        }
        if def.condition.is_deferred() {
            deferred.push(def);
            continue;
        }
        let fired = match def.condition.evaluate(ctx) {
            ConditionValue::Flag(hit) => hit,
            ConditionValue::Progress(value) => {
                ledger.set_progress(&def.id, value);
                def.target.is_some_and(|target| value >= target)
            }
        };
        if fired && ledger.unlock(&def.id, now) {
            info!("achievement unlocked: {}", def.id);
            unlocked.push(def);
        }
    }

    for def in deferred {
        if let Condition::CategoryUnlocks {
            categories,
            min_each,
        } = &def.condition
            && resolve_category_unlocks(catalog, ledger, def, categories, *min_each)
            && ledger.unlock(&def.id, now)
        {
            info!("achievement unlocked: {}", def.id);
            unlocked.push(def);
        }
    }

    unlocked
}

/// Record capped per-category unlock counts as progress; true once every
/// category reaches `min_each`.
fn resolve_category_unlocks(
    catalog: &AchievementCatalog,
    ledger: &mut AchievementLedger,
    def: &AchievementDef,
    categories: &[AchievementCategory],
    min_each: u32,
) -> bool {
    let counts: Vec<u32> = categories
        .iter()
        .map(|category| {
            let count = catalog
                .achievements
                .iter()
                .filter(|a| a.category == *category && ledger.is_unlocked(&a.id))
                .count();
            u32::try_from(count).unwrap_or(u32::MAX)
        })
        .collect();
    let progress: u64 = counts.iter().map(|&c| u64::from(c.min(min_each))).sum();
    debug!("{} progress {progress} from {counts:?}", def.id);
    ledger.set_progress(&def.id, progress);
    !counts.is_empty() && counts.iter().all(|&c| c >= min_each)
}
