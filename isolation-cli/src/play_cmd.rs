//! Play command - one game between two agents
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_agents(), setup_board(), report_game()
//! - Level 3: print_replay()
//! - Level 4: formatting utilities

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use isolation_core::{Board, GameBoard, Move, Player};
use isolation_tournament::{AgentConfig, Forfeit, GameOutcome, GameRunner};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// First player, as kind[:heuristic[:depth]] (e.g. alphabeta:manhattan)
    #[arg(long, value_name = "AGENT")]
    pub first: String,

    /// Second player, as kind[:heuristic[:depth]]
    #[arg(long, value_name = "AGENT")]
    pub second: String,

    /// Per-turn time limit in milliseconds
    #[arg(long, default_value = "150")]
    pub time_limit: u64,

    /// Board width
    #[arg(long, default_value = "7")]
    pub width: u8,

    /// Board height
    #[arg(long, default_value = "7")]
    pub height: u8,

    /// Start from one random placement per player
    #[arg(long)]
    pub random_opening: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Parse both agent specs
/// 2. Set up the starting board
/// 3. Play the game under the turn clock
/// 4. Replay it move by move and report the winner
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let (first, second) = load_agents(&args)?;
    let mut rng = create_rng(seed);
    let initial = setup_board(&args, &mut rng)?;

    tracing::info!(
        "Starting game: {} vs {} ({}x{}, {}ms per turn)",
        first.display_name(),
        second.display_name(),
        args.width,
        args.height,
        args.time_limit
    );

    let mut first_agent = first.build(rng.gen());
    let mut second_agent = second.build(rng.gen());
    let runner = GameRunner::new(Duration::from_millis(args.time_limit));
    let outcome = runner.play_game(first_agent.as_mut(), second_agent.as_mut(), initial);

    report_game(
        initial,
        &outcome,
        &[first.display_name(), second.display_name()],
    );

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_agents(args: &PlayArgs) -> Result<(AgentConfig, AgentConfig)> {
    let first = AgentConfig::parse_spec(&args.first)
        .with_context(|| format!("Invalid first agent: {}", args.first))?;
    let second = AgentConfig::parse_spec(&args.second)
        .with_context(|| format!("Invalid second agent: {}", args.second))?;
    Ok((first, second))
}

fn setup_board(args: &PlayArgs, rng: &mut ChaCha8Rng) -> Result<Board> {
    let mut board = Board::new(args.width, args.height)
        .with_context(|| format!("Invalid board size {}x{}", args.width, args.height))?;

    if args.random_opening {
        for _ in 0..2 {
            if let Some(&mv) = board.active_legal_moves().choose(rng) {
                board = board.forecast_move(mv);
            }
        }
    }
    Ok(board)
}

fn report_game(initial: Board, outcome: &GameOutcome, names: &[String; 2]) {
    println!("Initial board:\n{}", initial);
    print_replay(initial, &outcome.moves, names);

    let winner = seat_name(outcome.winner, names);
    let loser = seat_name(outcome.loser(), names);
    match outcome.forfeit {
        None => println!("{} wins: {} has no legal moves", winner, loser),
        Some(Forfeit::NoMove) => println!("{} wins: {} returned no move", winner, loser),
        Some(Forfeit::IllegalMove(mv)) => {
            println!("{} wins: {} played illegal move {}", winner, loser, mv)
        }
        Some(Forfeit::Timeout) => println!("{} wins: {} ran out of time", winner, loser),
    }
    println!("Moves played: {}", outcome.moves.len());
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Print the board after every move of the game
fn print_replay(initial: Board, moves: &[Move], names: &[String; 2]) {
    let mut state = initial;
    for (ply, &mv) in moves.iter().enumerate() {
        let mover = state.active_player();
        state = state.forecast_move(mv);
        println!(
            "Move {}: {} ({}) -> {}",
            ply + 1,
            seat_name(mover, names),
            mover,
            mv
        );
        println!("{}", state);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn seat_name(player: Player, names: &[String; 2]) -> &str {
    match player {
        Player::First => &names[0],
        Player::Second => &names[1],
    }
}
