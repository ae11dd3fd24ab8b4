//! Tournament command - test agents against an opponent pool
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), execute(), report_results()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use isolation_tournament::{run_tournament_with, TournamentConfig, TournamentResult};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct TournamentArgs {
    /// Tournament configuration JSON file (defaults when omitted)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override games per match
    #[arg(long)]
    pub games: Option<usize>,

    /// Override the per-turn time limit in milliseconds
    #[arg(long)]
    pub time_limit: Option<u64>,

    /// Play the games of each match in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run tournament command
///
/// 1. Load the configuration and apply overrides
/// 2. Play every match
/// 3. Report standings
pub fn run(args: TournamentArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args, seed)?;

    tracing::info!(
        "Starting tournament: {} test agents vs {} opponents ({} games per match, {}ms per turn)",
        config.test_agents.len(),
        config.opponents.len(),
        config.games_per_match,
        config.time_limit_ms
    );

    let result = execute(&config)?;

    report_results(&result, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &TournamentArgs, seed: Option<u64>) -> Result<TournamentConfig> {
    let mut config = match &args.config {
        Some(path) => TournamentConfig::load(path)?,
        None => TournamentConfig::default(),
    };

    if let Some(games) = args.games {
        config = config.with_games(games);
    }
    if let Some(time_limit) = args.time_limit {
        config = config.with_time_limit(time_limit);
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    config.parallel |= args.parallel;

    config.validate().context("Invalid tournament configuration")?;
    Ok(config)
}

fn execute(config: &TournamentConfig) -> Result<TournamentResult> {
    let total = (config.test_agents.len() * config.opponents.len()) as u64;
    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?,
    );

    let result = run_tournament_with(config, |m| {
        progress.set_message(format!("{} vs {}", m.agent, m.opponent));
        progress.inc(1);
    })?;

    progress.finish_and_clear();
    Ok(result)
}

fn report_results(result: &TournamentResult, args: &TournamentArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_text_results(result);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - FORMATTING
// ============================================================================

fn print_text_results(result: &TournamentResult) {
    println!("\n=== Matches ===");
    for m in &result.matches {
        println!(
            "{:<28} vs {:<28} {:>3}-{:<3} ({} forfeits)",
            m.agent, m.opponent, m.wins, m.losses, m.forfeits
        );
    }

    println!("\n=== Standings ===");
    println!(
        "{:<4} {:<28} {:>6} {:>6} {:>8} {:>8}",
        "Rank", "Agent", "Wins", "Losses", "Forfeits", "Win %"
    );
    for (rank, s) in result.standings.iter().enumerate() {
        println!(
            "{:<4} {:<28} {:>6} {:>6} {:>8} {:>7.1}%",
            rank + 1,
            s.name,
            s.wins,
            s.losses,
            s.forfeits,
            s.win_rate() * 100.0
        );
    }

    if let Some(winner) = result.winner() {
        println!("\nWinner: {}", winner.name);
    }
}
