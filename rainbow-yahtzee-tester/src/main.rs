mod logic;
mod util;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::info;
use rainbow_yahtzee_game::puzzle::catalog;
use rainbow_yahtzee_game::{GameMode, MemoryStore, ProfileEngine, ProfileStore, Puzzle};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    GameplayStrategy, JsonFileStore, RunReport, SeedInfo, SimulationConfig, play_game, play_puzzle,
    resolve_seed_inputs,
};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeSelection {
    /// Classic rules only
    Classic,
    /// Rainbow rules only
    Rainbow,
    /// Play every seed in both modes
    Both,
}

impl ModeSelection {
    const fn modes(self) -> &'static [GameMode] {
        match self {
            Self::Classic => &[GameMode::Classic],
            Self::Rainbow => &[GameMode::Rainbow],
            Self::Both => &GameMode::ALL,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "rainbow-yahtzee-tester", version)]
#[command(about = "Self-play QA runner for the Rainbow Yahtzee rules engine")]
struct Args {
    /// Rule set to play
    #[arg(long, value_enum, default_value_t = ModeSelection::Both)]
    mode: ModeSelection,

    /// Seeds to play (numbers or share codes, comma-separated; `all` expands every code)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Players per game
    #[arg(long, default_value_t = 1)]
    players: usize,

    /// Strategy the bots play with
    #[arg(long, value_enum, default_value_t = GameplayStrategy::Greedy)]
    strategy: GameplayStrategy,

    /// Puzzles to attempt: ids, `classic`, `rainbow` or `all` (comma-separated)
    #[arg(long, default_value = "")]
    puzzles: String,

    /// Attempts allowed per puzzle before giving up
    #[arg(long, default_value_t = 3)]
    puzzle_attempts: u32,

    /// List the puzzle catalog and exit
    #[arg(long)]
    list_puzzles: bool,

    /// List achievements with profile progress and exit
    #[arg(long)]
    list_achievements: bool,

    /// Directory holding a persistent profile; in-memory when omitted
    #[arg(long)]
    profile_dir: Option<PathBuf>,

    /// Clear the profile before playing
    #[arg(long)]
    reset_profile: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let failed = match &args.profile_dir {
        Some(dir) => {
            let store = JsonFileStore::open(dir)?;
            info!("using profile in {}", store.dir().display());
            execute(&args, &ProfileEngine::new(store))?
        }
        None => execute(&args, &ProfileEngine::new(MemoryStore::new()))?,
    };
    if failed {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .try_init();
}

/// Run everything `args` asks for; returns whether any game broke a rule.
fn execute<S>(args: &Args, engine: &ProfileEngine<'static, S>) -> Result<bool>
where
    S: ProfileStore,
{
    if maybe_list(args, engine)? {
        return Ok(false);
    }
    if args.reset_profile {
        engine.wipe()?;
    }
    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let puzzles = select_puzzles(&args.puzzles)?;

    let mut report = RunReport::default();
    run_games(args, &seed_infos, engine, &mut report)?;
    let puzzle_seed = seed_infos.first().map_or(1337, |s| s.seed);
    run_puzzles(args, &puzzles, puzzle_seed, engine, &mut report)?;
    report.stats = engine.stats()?;

    write_reports(args, &report, start_time)?;
    Ok(report.failed_games() > 0)
}

fn maybe_list<S>(args: &Args, engine: &ProfileEngine<'static, S>) -> Result<bool>
where
    S: ProfileStore,
{
    if !args.list_puzzles && !args.list_achievements {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    if args.list_puzzles {
        writeln!(output_target.writer(), "Available puzzles:")?;
        for puzzle in &catalog().puzzles {
            writeln!(
                output_target.writer(),
                "  {:20} {:8} {:7} - {}",
                puzzle.id,
                puzzle.game_mode.as_str(),
                puzzle.difficulty.as_str(),
                puzzle.title
            )?;
        }
    }
    if args.list_achievements {
        writeln!(output_target.writer(), "Achievements:")?;
        for status in engine.achievements_with_progress()? {
            let mark = if status.progress.unlocked { "x" } else { " " };
            let progress = status
                .def
                .target
                .map(|target| format!(" ({}/{target})", status.progress.progress.min(target)))
                .unwrap_or_default();
            writeln!(
                output_target.writer(),
                "  [{mark}] {:24} {}{progress}",
                status.def.id,
                status.def.title
            )?;
        }
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎲 Rainbow Yahtzee Tester".bright_cyan().bold());
    println!("{}", "=========================".cyan());
}

/// Resolve the `--puzzles` argument against the catalog.
fn select_puzzles(arg: &str) -> Result<Vec<&'static Puzzle>> {
    let catalog = catalog();
    let mut selected: Vec<&'static Puzzle> = Vec::new();
    for token in split_csv(arg) {
        let batch: Vec<&'static Puzzle> = match token.to_ascii_lowercase().as_str() {
            "all" => catalog.puzzles.iter().collect(),
            "classic" => catalog.by_mode(GameMode::Classic),
            "rainbow" => catalog.by_mode(GameMode::Rainbow),
            _ => match catalog.get(&token) {
                Some(puzzle) => vec![puzzle],
                None => bail!("Unknown puzzle: {token}"),
            },
        };
        for puzzle in batch {
            if !selected.iter().any(|p| p.id == puzzle.id) {
                selected.push(puzzle);
            }
        }
    }
    Ok(selected)
}

fn run_games<S>(
    args: &Args,
    seed_infos: &[SeedInfo],
    engine: &ProfileEngine<'static, S>,
    report: &mut RunReport,
) -> Result<()>
where
    S: ProfileStore,
{
    for seed_info in seed_infos {
        for &mode in args.mode.modes() {
            if !seed_info.matches_mode(mode) {
                continue;
            }
            let config =
                SimulationConfig::new(mode, args.strategy, seed_info.seed).with_players(args.players);
            let mut summary = play_game(&config, Utc::now())?;
            summary.share_code = seed_info.share_code_for_mode(mode);
            for event in &summary.events {
                for def in engine.record_game(event)? {
                    report.unlocked.push(def.title.clone());
                }
            }
            info!("{} finished in {} turns", summary.share_code, summary.turns);
            report.games.push(summary);
        }
    }
    Ok(())
}

fn run_puzzles<S>(
    args: &Args,
    puzzles: &[&Puzzle],
    seed: u64,
    engine: &ProfileEngine<'static, S>,
    report: &mut RunReport,
) -> Result<()>
where
    S: ProfileStore,
{
    for puzzle in puzzles {
        let run = play_puzzle(puzzle, args.strategy, seed, args.puzzle_attempts)?;
        for outcome in &run.outcomes {
            let recorded = engine.record_puzzle(outcome, Utc::now())?;
            for def in recorded.unlocked {
                report.unlocked.push(def.title.clone());
            }
        }
        report.puzzles.push(run);
    }
    Ok(())
}

fn write_reports(args: &Args, report: &RunReport, start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, report)?,
        "markdown" => {
            if report.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Rainbow Yahtzee Tester Results\n\n_Nothing was played._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, report)?;
            }
        }
        "csv" => logic::reports::generate_csv_report(&mut output_target, report)?,
        _ => {
            let duration = start_time.elapsed();
            if report.is_empty() {
                writeln!(&mut output_target, "Nothing was played.")?;
            } else {
                logic::reports::generate_console_report(&mut output_target, report, duration)?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            mode: ModeSelection::Both,
            seeds: "1337".to_string(),
            players: 1,
            strategy: GameplayStrategy::Greedy,
            puzzles: String::new(),
            puzzle_attempts: 1,
            list_puzzles: false,
            list_achievements: false,
            profile_dir: None,
            reset_profile: false,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rainbow-yahtzee-{}-{name}", std::process::id()))
    }

    #[test]
    fn mode_selection_expands() {
        assert_eq!(ModeSelection::Both.modes(), &GameMode::ALL);
        assert_eq!(ModeSelection::Rainbow.modes(), &[GameMode::Rainbow]);
    }

    #[test]
    fn select_puzzles_handles_keywords_and_ids() {
        assert!(select_puzzles("").unwrap().is_empty());
        let classic = select_puzzles("classic").unwrap();
        assert!(classic.iter().all(|p| p.game_mode == GameMode::Classic));
        let mixed = select_puzzles("classic-easy-1,all").unwrap();
        assert_eq!(mixed.len(), catalog().puzzles.len());
        assert_eq!(mixed[0].id, "classic-easy-1");
        assert!(select_puzzles("nope").is_err());
    }

    #[test]
    fn share_code_seeds_only_play_their_mode() {
        let args = base_args();
        let seeds = resolve_seed_inputs(&["RB-PRISM07".to_string()]).unwrap();
        let engine = ProfileEngine::new(MemoryStore::new());
        let mut report = RunReport::default();
        run_games(&args, &seeds, &engine, &mut report).unwrap();
        assert_eq!(report.games.len(), 1);
        assert_eq!(report.games[0].share_code, "RB-PRISM07");
        assert_eq!(engine.stats().unwrap().total_games, 1);
    }

    #[test]
    fn puzzles_feed_the_profile() {
        let args = base_args();
        let engine = ProfileEngine::new(MemoryStore::new());
        let mut report = RunReport::default();
        let puzzles = select_puzzles("classic-easy-2").unwrap();
        run_puzzles(&args, &puzzles, 5, &engine, &mut report).unwrap();
        assert_eq!(report.puzzles.len(), 1);
        assert_eq!(engine.stats().unwrap().puzzles_played, 1);
        assert!(engine.puzzle_records().unwrap().contains_key("classic-easy-2"));
    }

    #[test]
    fn write_reports_emits_json_output() {
        let temp = temp_file("report.json");
        let args = Args {
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &RunReport::default(), Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("\"games\": []"));
    }

    #[test]
    fn write_reports_markdown_empty_run() {
        let temp = temp_file("report.md");
        let args = Args {
            report: "markdown".to_string(),
            output: Some(temp.clone()),
            ..base_args()
        };
        write_reports(&args, &RunReport::default(), Instant::now()).unwrap();
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Nothing was played"));
    }

    #[test]
    fn maybe_list_writes_puzzles_and_achievements() {
        let temp = temp_file("list.txt");
        let args = Args {
            list_puzzles: true,
            list_achievements: true,
            output: Some(temp.clone()),
            ..base_args()
        };
        let engine = ProfileEngine::new(MemoryStore::new());
        assert!(maybe_list(&args, &engine).unwrap());
        let content = std::fs::read_to_string(temp).unwrap();
        assert!(content.contains("Available puzzles"));
        assert!(content.contains("classic-easy-1"));
        assert!(content.contains("Achievements:"));
    }

    #[test]
    fn maybe_list_returns_false_when_disabled() {
        let engine = ProfileEngine::new(MemoryStore::new());
        assert!(!maybe_list(&base_args(), &engine).unwrap());
    }
}
