//! Isolation CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game between two agents
//! - tournament: Evaluate test agents against an opponent pool

mod play_cmd;
mod tournament_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "isolation")]
#[command(about = "Isolation game-playing agents and tournament runner")]
struct Cli {
    /// Random seed for openings and random agents
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game, printing the board after every move
    Play(play_cmd::PlayArgs),
    /// Run a tournament and print the standings
    Tournament(tournament_cmd::TournamentArgs),
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Tournament(args) => tournament_cmd::run(args, cli.seed),
    }
}
