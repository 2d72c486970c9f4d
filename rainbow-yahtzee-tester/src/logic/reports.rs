use anyhow::Result;
use colored::Colorize;
use rainbow_yahtzee_game::AllTimeStats;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::simulation::{GameSummary, PuzzleRun};

/// Everything one tester run produced.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub games: Vec<GameSummary>,
    pub puzzles: Vec<PuzzleRun>,
    /// Achievement titles unlocked during the run, in unlock order.
    pub unlocked: Vec<String>,
    pub stats: AllTimeStats,
}

impl RunReport {
    #[must_use]
    pub fn failed_games(&self) -> usize {
        self.games.iter().filter(|g| !g.passed()).count()
    }

    #[must_use]
    pub fn solved_puzzles(&self) -> usize {
        self.puzzles.iter().filter(|p| p.success).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty() && self.puzzles.is_empty()
    }
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn best_score(game: &GameSummary) -> u32 {
    game.players.iter().map(|p| p.score).max().unwrap_or(0)
}

pub fn generate_console_report(
    writer: &mut impl Write,
    report: &RunReport,
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Rainbow Yahtzee Run Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "==============================".cyan())?;

    let failed = report.failed_games();
    writeln!(writer, "Games played: {}", report.games.len())?;
    writeln!(writer, "Rule failures: {}", failed.to_string().red())?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for game in &report.games {
        let status = if game.passed() {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            writer,
            "{} {} {} ({}) in {} turns",
            status,
            game.share_code.bold(),
            game.mode,
            game.strategy,
            game.turns
        )?;
        for player in &game.players {
            writeln!(
                writer,
                "   {}: {} (upper {} + {}, lower {}, color {})",
                player.name,
                player.score,
                player.totals.upper,
                player.totals.upper_bonus,
                player.totals.lower,
                player.totals.color
            )?;
        }
        for issue in &game.issues {
            writeln!(writer, "     • {}", issue.red())?;
        }
    }

    if !report.puzzles.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", "🧩 Puzzle Summary".bright_yellow().bold())?;
        writeln!(writer, "{}", "=================".yellow())?;
        let solved = report.solved_puzzles();
        writeln!(
            writer,
            "Solved: {solved}/{} ({:.1}%)",
            report.puzzles.len(),
            percent(solved, report.puzzles.len())
        )?;
        for run in &report.puzzles {
            let status = if run.success {
                "✅".to_string()
            } else {
                format!("❌ {}", run.fail_reason.map_or("missed", |r| r.code()))
            };
            writeln!(
                writer,
                "{} {} [{}] score {} after {} attempt(s)",
                status, run.puzzle_id, run.difficulty, run.score, run.attempts
            )?;
        }
    }

    if !report.unlocked.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", "🏆 Achievements Unlocked".bright_magenta().bold())?;
        for title in &report.unlocked {
            writeln!(writer, "  • {title}")?;
        }
    }

    if let Some(best) = report.games.iter().max_by_key(|g| best_score(g)) {
        writeln!(writer)?;
        writeln!(
            writer,
            "Best game: {} with {}",
            best.share_code.green(),
            best_score(best)
        )?;
    }
    Ok(())
}

pub fn generate_json_report(writer: &mut impl Write, report: &RunReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(writer: &mut impl Write, report: &RunReport) -> Result<()> {
    writeln!(writer, "# Rainbow Yahtzee Tester Results\n")?;

    let failed = report.failed_games();
    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Games**: {}", report.games.len())?;
    writeln!(writer, "- **Rule failures**: {failed}")?;
    writeln!(
        writer,
        "- **Puzzles solved**: {}/{}",
        report.solved_puzzles(),
        report.puzzles.len()
    )?;
    writeln!(writer, "- **Achievements unlocked**: {}\n", report.unlocked.len())?;

    if !report.games.is_empty() {
        writeln!(writer, "## Games\n")?;
        writeln!(writer, "| Code | Mode | Strategy | Turns | Best | Status |")?;
        writeln!(writer, "|------|------|----------|-------|------|--------|")?;
        for game in &report.games {
            let status = if game.passed() { "✅" } else { "❌" };
            writeln!(
                writer,
                "| {} | {} | {} | {} | {} | {} |",
                game.share_code,
                game.mode,
                game.strategy,
                game.turns,
                best_score(game),
                status
            )?;
        }
        writeln!(writer)?;
    }

    if !report.puzzles.is_empty() {
        writeln!(writer, "## Puzzles\n")?;
        for run in &report.puzzles {
            let status = if run.success { "✅" } else { "❌" };
            writeln!(
                writer,
                "- {status} **{}** ({}): score {}, {} attempt(s)",
                run.puzzle_id, run.difficulty, run.score, run.attempts
            )?;
        }
    }
    Ok(())
}

pub fn generate_csv_report(writer: &mut impl Write, report: &RunReport) -> Result<()> {
    writeln!(
        writer,
        "share_code,mode,strategy,seed,player,score,upper,upper_bonus,lower,color,bonus_yahtzees,zeroes,turns"
    )?;
    for game in &report.games {
        for player in &game.players {
            writeln!(
                writer,
                "{},{},{},{},{},{},{},{},{},{},{},{},{}",
                game.share_code,
                game.mode.as_str(),
                game.strategy,
                game.seed,
                player.name,
                player.score,
                player.totals.upper,
                player.totals.upper_bonus,
                player.totals.lower,
                player.totals.color,
                player.bonus_yahtzees,
                player.zeroes,
                game.turns
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::policy::GameplayStrategy;
    use crate::logic::simulation::{SimulationConfig, play_game, play_puzzle};
    use chrono::Utc;
    use rainbow_yahtzee_game::GameMode;
    use rainbow_yahtzee_game::puzzle::catalog;

    fn sample_report() -> RunReport {
        let config = SimulationConfig::new(GameMode::Rainbow, GameplayStrategy::Greedy, 11);
        let puzzle = catalog().get("classic-easy-2").unwrap();
        RunReport {
            games: vec![play_game(&config, Utc::now()).unwrap()],
            puzzles: vec![play_puzzle(puzzle, GameplayStrategy::Greedy, 11, 2).unwrap()],
            unlocked: vec!["First Roll".to_string()],
            stats: AllTimeStats::default(),
        }
    }

    #[test]
    fn console_report_lists_games_and_puzzles() {
        let mut out = Vec::new();
        generate_console_report(&mut out, &sample_report(), Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rainbow Yahtzee Run Summary"));
        assert!(text.contains("classic-easy-2"));
        assert!(text.contains("First Roll"));
    }

    #[test]
    fn json_report_uses_camel_case() {
        let mut out = Vec::new();
        generate_json_report(&mut out, &sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value["games"][0]["shareCode"].as_str().unwrap().starts_with("RB-"));
        assert_eq!(value["puzzles"][0]["puzzleId"], "classic-easy-2");
    }

    #[test]
    fn markdown_and_csv_have_headers() {
        let report = sample_report();
        let mut md = Vec::new();
        generate_markdown_report(&mut md, &report).unwrap();
        assert!(String::from_utf8(md).unwrap().contains("| Code | Mode |"));

        let mut csv = Vec::new();
        generate_csv_report(&mut csv, &report).unwrap();
        let csv = String::from_utf8(csv).unwrap();
        assert!(csv.starts_with("share_code,mode,strategy"));
        assert_eq!(csv.lines().count(), 2);
    }
}
